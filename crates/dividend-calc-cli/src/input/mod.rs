pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Structured input for a command: the `--input` file when given, otherwise
/// JSON piped on stdin. `None` means the caller should fall back to flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path).map(Some);
    }
    stdin::read_stdin()
}
