use is_executable::IsExecutable;
use std::path::Path;

/// Mode of a regular file as recorded in the index and in trees
#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum EntryMode {
    #[default]
    Regular,
    Executable,
}

impl EntryMode {
    pub const REGULAR: u32 = 0o100644;
    pub const EXECUTABLE: u32 = 0o100755;
    pub const DIRECTORY: u32 = 0o40000;

    pub fn for_path(path: &Path) -> Self {
        if path.is_executable() {
            EntryMode::Executable
        } else {
            EntryMode::Regular
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::Regular => Self::REGULAR,
            EntryMode::Executable => Self::EXECUTABLE,
        }
    }
}
