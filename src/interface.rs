use camino::Utf8PathBuf;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use rit_objects::{Digest, ObjectType};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty object database
    Init,

    /// Compute the id of files, optionally writing them to the database
    HashObject {
        /// Type of object to create
        #[clap(short = 't', long = "type", default_value = "blob")]
        object_type: ObjectType,

        /// Write the objects into the database
        #[clap(short, long)]
        write: bool,

        /// Read the object from stdin
        #[clap(long)]
        stdin: bool,

        files: Vec<Utf8PathBuf>,
    },

    /// Write the contents of a directory as a tree
    WriteTree {
        /// Defaults to the repository root
        dir: Option<Utf8PathBuf>,
    },

    /// Create a commit object for a tree
    CommitTree {
        #[clap(value_name = "tree")]
        tree: Digest,

        #[clap(short = 'p', value_name = "parent")]
        parents: Vec<Digest>,

        #[clap(short, long, env = "RIT_COMMIT_MESSAGE")]
        message: String,

        /// Character set for the commit text, e.g. ISO-8859-1
        #[clap(long)]
        encoding: Option<String>,

        #[clap(flatten)]
        ident: Identity,
    },

    /// Create an annotated tag object
    Tag {
        #[clap(short = 'n', long)]
        name: String,

        #[clap(short = 'o', long)]
        object: Digest,

        #[clap(short = 't', long = "type", default_value = "commit")]
        object_type: ObjectType,

        #[clap(short, long)]
        message: String,

        #[clap(flatten)]
        ident: Identity,
    },

    #[clap(subcommand)]
    CatFile(CatFile),
}

#[derive(Clone, Debug, Args)]
pub struct Identity {
    #[clap(long, env = "RIT_AUTHOR_NAME")]
    pub author_name: String,

    #[clap(long, env = "RIT_AUTHOR_EMAIL")]
    pub author_email: String,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CatFile {
    /// Exit with status `ExitCode::SUCCESS` if `object` exists, and `ExitCode::FAILURE`
    /// otherwise.
    #[clap(short_flag = 'e')]
    Exists {
        #[clap(value_name = "object")]
        object: Digest,
    },

    /// Pretty-print the contents of `object` based on its type
    #[clap(short_flag = 'p')]
    PrettyPrint {
        #[clap(value_name = "object")]
        object: Digest,
    },

    /// Print the type of `object` to stdout
    #[clap(short_flag = 't')]
    Type {
        #[clap(value_name = "object")]
        object: Digest,
    },

    /// Print the size of `object` to stdout
    #[clap(short_flag = 's')]
    Size {
        #[clap(value_name = "object")]
        object: Digest,
    },
}

#[derive(Debug, Parser)]
#[clap(version)]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// The path to be used.
    #[clap(short, long)]
    pub path: Option<Utf8PathBuf>,

    /// zlib level for new objects: -1 for the default, or 0 to 9
    #[clap(
        long,
        env = "RIT_COMPRESSION",
        default_value_t = -1,
        allow_negative_numbers = true
    )]
    pub compression: i32,
}
