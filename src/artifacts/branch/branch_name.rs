use crate::artifacts::branch::{
    DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX, REF_PREFIX, SYMREF_PREFIX,
};
use crate::errors::TwigError;
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if name.is_empty() || re.is_match(&name) {
            Err(TwigError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    /// Parse the contents of `HEAD`, e.g. `ref: refs/heads/master\n`
    pub fn try_parse_symref(content: &str) -> anyhow::Result<Self> {
        let target = content
            .trim_end()
            .strip_prefix(SYMREF_PREFIX)
            .and_then(|target| target.strip_prefix(REF_PREFIX))
            .ok_or_else(|| TwigError::InvalidBranchName(content.trim_end().to_string()))?;

        Self::try_parse(target.to_string())
    }

    /// The line written to `HEAD` to make this the current branch
    pub fn to_symref(&self) -> String {
        format!("{SYMREF_PREFIX}{REF_PREFIX}{}\n", self.0)
    }

    /// Location of the branch ref relative to the metadata directory
    pub fn ref_path(&self) -> PathBuf {
        PathBuf::from(REF_PREFIX).join(&self.0)
    }
}

impl Default for BranchName {
    fn default() -> Self {
        BranchName(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
