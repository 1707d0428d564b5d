mod interface;

use std::io::Write;

use bstr::ByteSlice;
use camino::Utf8Path;
use clap::Parser;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use tracing_subscriber::prelude::*;

use rit_objects::digest::DIGEST_LEN;
use rit_objects::{
    snapshot, Commit, CoreConfig, Digest, FileMode, ObjectDatabase, ObjectType, ObjectWriter,
    PersonIdent, Repo, Tag, Timestamp,
};

use crate::interface::*;

static ARGS: Lazy<Opt> = Lazy::new(Opt::parse);

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Lazy::force(&ARGS);

    let path = match ARGS.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{}'", path))?,
        None => {
            let cwd = std::env::current_dir()?.canonicalize()?;
            camino::Utf8PathBuf::from_path_buf(cwd)
                .map_err(|p| eyre!("Path is not valid unicode: '{}'", p.display()))?
        }
    };

    if matches!(ARGS.command, Command::Init) {
        Repo::init(&path)?;
        println!("Initialized empty object database in {}", path.join(".git/objects"));
        return Ok(());
    }

    let config = CoreConfig::new(ARGS.compression)?;
    let repo = Repo::open(path)?.with_config(config);

    match &ARGS.command {
        Command::Init => unreachable!(),
        Command::HashObject {
            object_type,
            write,
            stdin,
            files,
        } => {
            if *stdin {
                let mut writer = repo.new_writer();
                let mut input = std::io::stdin().lock();
                let oid = if *write {
                    writer.insert_spooled(*object_type, &mut input)?
                } else {
                    writer.id_for_spooled(*object_type, &mut input)?
                };
                println!("{oid:x}");
            }

            // One writer per worker thread; writers are not shared.
            let oids = files
                .par_iter()
                .map_init(
                    || repo.new_writer(),
                    |writer, file| hash_file(writer, *object_type, file, *write),
                )
                .collect::<Result<Vec<_>>>()?;
            for oid in oids {
                println!("{oid:x}");
            }
        }
        Command::WriteTree { dir } => {
            let dir = dir.as_deref().unwrap_or_else(|| repo.dir());
            let oid = snapshot::write_tree(&mut repo.new_writer(), dir)
                .wrap_err(format!("Failed to write tree for {dir}"))?;
            println!("{oid:x}");
        }
        Command::CommitTree {
            tree,
            parents,
            message,
            encoding,
            ident,
        } => {
            let ident = person(ident);
            let mut commit = Commit::new(
                *tree,
                parents.clone(),
                ident.clone(),
                ident,
                complete_line(message),
            );
            commit.encoding = encoding.clone();
            let oid = repo.new_writer().write_commit(&commit)?;
            println!("{oid:x}");
        }
        Command::Tag {
            name,
            object,
            object_type,
            message,
            ident,
        } => {
            let (actual, _) = repo.object_database().read_raw(object)?;
            if actual != *object_type {
                return Err(eyre!("Object {object:x} is a {actual}, not a {object_type}"));
            }
            let tag = Tag {
                object: *object,
                object_type: *object_type,
                name: name.clone(),
                tagger: person(ident),
                message: complete_line(message),
            };
            let oid = repo.new_writer().write_tag(&tag)?;
            println!("{oid:x}");
        }
        Command::CatFile(cat_file) => cat_file_command(&repo, cat_file)?,
    }
    Ok(())
}

fn hash_file(
    writer: &mut ObjectWriter,
    object_type: ObjectType,
    path: &Utf8Path,
    write: bool,
) -> Result<Digest> {
    let mut file =
        std::fs::File::open(path).wrap_err(format!("Failed to open file: {}", path))?;
    let len = file.metadata()?.len();
    let oid = if write {
        writer.insert_stream(object_type, len, &mut file)
    } else {
        writer.id_for_stream(object_type, len, &mut file)
    };
    oid.wrap_err(format!("Failed to hash file: {}", path))
}

fn person(ident: &Identity) -> PersonIdent {
    PersonIdent::new(&ident.author_name, &ident.author_email, Timestamp::now())
}

fn complete_line(message: &str) -> String {
    let mut message = message.to_owned();
    if !message.ends_with('\n') {
        message.push('\n');
    }
    message
}

fn cat_file_command(repo: &Repo, cat_file: &CatFile) -> Result<()> {
    let db = repo.object_database();
    match cat_file {
        CatFile::Exists { object } => {
            if !db.has_object(object) {
                std::process::exit(1);
            }
        }
        CatFile::Type { object } => {
            let (ty, _) = db.read_raw(object)?;
            println!("{ty}");
        }
        CatFile::Size { object } => {
            let (_, content) = db.read_raw(object)?;
            println!("{}", content.len());
        }
        CatFile::PrettyPrint { object } => {
            let (ty, content) = db.read_raw(object)?;
            let mut stdout = std::io::stdout().lock();
            match ty {
                ObjectType::Tree => print_tree(&mut stdout, &content)?,
                _ => stdout.write_all(&content)?,
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Print each tree entry as `mode type oid<TAB>name`, like `git ls-tree`.
fn print_tree(out: &mut impl Write, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        let space = memchr::memchr(b' ', data).ok_or_else(|| eyre!("Truncated tree entry"))?;
        let nul = memchr::memchr(b'\0', data).ok_or_else(|| eyre!("Truncated tree entry"))?;
        let end = nul + 1 + DIGEST_LEN;
        if space > nul || data.len() < end {
            return Err(eyre!("Truncated tree entry"));
        }

        let mode = u32::from_str_radix(std::str::from_utf8(&data[..space])?, 8)?;
        let mode = FileMode(mode);
        let name = data[space + 1..nul].as_bstr();
        let mut raw = [0; DIGEST_LEN];
        raw.copy_from_slice(&data[nul + 1..end]);
        let oid = Digest::from_raw(raw);

        let kind = if mode.is_tree() {
            ObjectType::Tree
        } else if mode == FileMode::GITLINK {
            ObjectType::Commit
        } else {
            ObjectType::Blob
        };
        writeln!(out, "{:06o} {} {:x}\t{}", mode.0, kind, oid, name)?;

        data = &data[end..];
    }
    Ok(())
}
