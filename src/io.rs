use std::path::Path;

use anyhow::Context;

pub(crate) fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {:?}", path))
}

pub(crate) fn load_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))
}
