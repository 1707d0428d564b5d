use rand::distributions::Alphanumeric;
use rand::prelude::*;

/// A random name for a file staged in the object directory, e.g. `tmp_obj_Xf3kQa`.
pub fn tmp_file_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("tmp_obj_{suffix}")
}
