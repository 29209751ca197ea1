pub mod branch_name;

/// Characters and sequences git refuses in ref names
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch a fresh repository starts on
pub const DEFAULT_BRANCH: &str = "master";

pub const REF_PREFIX: &str = "refs/heads/";
pub const SYMREF_PREFIX: &str = "ref: ";
