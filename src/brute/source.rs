// src/brute/source.rs
use std::path::Path;
use log::debug;
use crate::common::utils;
use crate::error::{Error, Result};
use super::Credential;

/// Ordered, finite list of candidates to try against a target.
///
/// Lists are read fully into memory when the source is built. Iteration
/// always starts from the first candidate and follows file order; nothing
/// is shuffled or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// 固定用户名 + 密码字典
    SingleUser {
        username: String,
        passwords: Vec<String>,
    },
    /// `username:password` 组合字典
    PairedList {
        pairs: Vec<Credential>,
    },
    /// 用户名字典 × 密码字典，外层用户名、内层密码
    DictionaryProduct {
        usernames: Vec<String>,
        passwords: Vec<String>,
    },
}

impl CredentialSource {
    pub fn single_user(username: impl Into<String>, password_list: impl AsRef<Path>) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(Error::Config("username must not be empty".into()));
        }

        let passwords = load_non_empty(password_list.as_ref())?;
        debug!("Loaded {} passwords for user '{}'", passwords.len(), username);

        Ok(CredentialSource::SingleUser { username, passwords })
    }

    pub fn paired_list(credentials_list: impl AsRef<Path>) -> Result<Self> {
        let path = credentials_list.as_ref();
        let lines = utils::read_list_file(path)?;
        let total_lines = lines.len();

        // 没有冒号的行直接跳过
        let pairs: Vec<Credential> = lines
            .iter()
            .filter_map(|line| Credential::parse_pair(line))
            .collect();

        if pairs.len() < total_lines {
            debug!(
                "Skipped {} malformed lines in {}",
                total_lines - pairs.len(),
                path.display()
            );
        }

        if pairs.is_empty() {
            return Err(Error::EmptyList { path: path.to_path_buf() });
        }

        Ok(CredentialSource::PairedList { pairs })
    }

    pub fn dictionary(usernames_list: impl AsRef<Path>, password_list: impl AsRef<Path>) -> Result<Self> {
        let usernames = load_non_empty(usernames_list.as_ref())?;
        let passwords = load_non_empty(password_list.as_ref())?;

        Ok(CredentialSource::DictionaryProduct { usernames, passwords })
    }

    /// 候选总数，与迭代实际产生的数量一致
    pub fn len(&self) -> usize {
        match self {
            CredentialSource::SingleUser { passwords, .. } => passwords.len(),
            CredentialSource::PairedList { pairs } => pairs.len(),
            CredentialSource::DictionaryProduct { usernames, passwords } => {
                usernames.len() * passwords.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate at `index`, in iteration order.
    pub fn get(&self, index: usize) -> Option<Credential> {
        if index >= self.len() {
            return None;
        }

        let credential = match self {
            CredentialSource::SingleUser { username, passwords } => {
                Credential::new(username.clone(), passwords[index].clone())
            }
            CredentialSource::PairedList { pairs } => pairs[index].clone(),
            CredentialSource::DictionaryProduct { usernames, passwords } => {
                let per_user = passwords.len();
                Credential::new(
                    usernames[index / per_user].clone(),
                    passwords[index % per_user].clone(),
                )
            }
        };

        Some(credential)
    }

    pub fn iter(&self) -> Candidates<'_> {
        Candidates { source: self, next: 0 }
    }

    pub fn describe(&self) -> String {
        match self {
            CredentialSource::SingleUser { username, passwords } => {
                format!("user '{}' with {} passwords", username, passwords.len())
            }
            CredentialSource::PairedList { pairs } => {
                format!("{} credential pairs", pairs.len())
            }
            CredentialSource::DictionaryProduct { usernames, passwords } => format!(
                "{} usernames x {} passwords",
                usernames.len(),
                passwords.len()
            ),
        }
    }
}

impl<'a> IntoIterator for &'a CredentialSource {
    type Item = Credential;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the candidates of a [`CredentialSource`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    source: &'a CredentialSource,
    next: usize,
}

impl Iterator for Candidates<'_> {
    type Item = Credential;

    fn next(&mut self) -> Option<Self::Item> {
        let credential = self.source.get(self.next)?;
        self.next += 1;
        Some(credential)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}

fn load_non_empty(path: &Path) -> Result<Vec<String>> {
    let entries = utils::read_list_file(path)?;
    if entries.is_empty() {
        return Err(Error::EmptyList { path: path.to_path_buf() });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_list(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("list written");
        path
    }

    fn collect(source: &CredentialSource) -> Vec<(String, String)> {
        source
            .iter()
            .map(|c| (c.username, c.password))
            .collect()
    }

    #[test]
    fn single_user_keeps_file_order() {
        let dir = tempdir().expect("temp dir created");
        let passwords = write_list(&dir, "pw.txt", "toor\n\nroot\npassword\n123456\n");

        let source = CredentialSource::single_user("root", &passwords).unwrap();
        assert_eq!(source.len(), 4);

        let got = collect(&source);
        assert!(got.iter().all(|(user, _)| user == "root"));
        let order: Vec<&str> = got.iter().map(|(_, pw)| pw.as_str()).collect();
        assert_eq!(order, vec!["toor", "root", "password", "123456"]);
    }

    #[test]
    fn single_user_keeps_duplicates() {
        let dir = tempdir().expect("temp dir created");
        let passwords = write_list(&dir, "pw.txt", "admin\nadmin\n");

        let source = CredentialSource::single_user("admin", &passwords).unwrap();
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn single_user_with_empty_list_fails() {
        let dir = tempdir().expect("temp dir created");
        let passwords = write_list(&dir, "pw.txt", "\n   \n\n");

        let err = CredentialSource::single_user("root", &passwords).unwrap_err();
        assert!(matches!(err, Error::EmptyList { .. }));
    }

    #[test]
    fn single_user_with_missing_list_fails() {
        let dir = tempdir().expect("temp dir created");
        let err = CredentialSource::single_user("root", dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingFile { .. }));
    }

    #[test]
    fn paired_list_splits_on_first_colon_and_skips_malformed() {
        let dir = tempdir().expect("temp dir created");
        let creds = write_list(
            &dir,
            "creds.txt",
            "alice:correct:horse\nnocolon\n\nbob:hunter2\n:emptyuser\n",
        );

        let source = CredentialSource::paired_list(&creds).unwrap();
        assert_eq!(
            collect(&source),
            vec![
                ("alice".to_string(), "correct:horse".to_string()),
                ("bob".to_string(), "hunter2".to_string()),
                ("".to_string(), "emptyuser".to_string()),
            ]
        );
    }

    #[test]
    fn paired_list_with_only_malformed_lines_fails() {
        let dir = tempdir().expect("temp dir created");
        let creds = write_list(&dir, "creds.txt", "one\ntwo\n");

        let err = CredentialSource::paired_list(&creds).unwrap_err();
        assert!(matches!(err, Error::EmptyList { .. }));
    }

    #[test]
    fn dictionary_iterates_usernames_outer_passwords_inner() {
        let dir = tempdir().expect("temp dir created");
        let users = write_list(&dir, "users.txt", "u1\nu2\n");
        let passwords = write_list(&dir, "pw.txt", "p1\np2\n");

        let source = CredentialSource::dictionary(&users, &passwords).unwrap();
        assert_eq!(source.len(), 4);
        assert_eq!(
            collect(&source),
            vec![
                ("u1".to_string(), "p1".to_string()),
                ("u1".to_string(), "p2".to_string()),
                ("u2".to_string(), "p1".to_string()),
                ("u2".to_string(), "p2".to_string()),
            ]
        );
    }

    #[test]
    fn dictionary_with_empty_usernames_fails() {
        let dir = tempdir().expect("temp dir created");
        let users = write_list(&dir, "users.txt", "");
        let passwords = write_list(&dir, "pw.txt", "p1\n");

        assert!(CredentialSource::dictionary(&users, &passwords).is_err());
    }

    #[test]
    fn building_twice_yields_identical_sequences() {
        let dir = tempdir().expect("temp dir created");
        let users = write_list(&dir, "users.txt", "root\nadmin\nguest\n");
        let passwords = write_list(&dir, "pw.txt", "a\nb\nc\n");

        let first = CredentialSource::dictionary(&users, &passwords).unwrap();
        let second = CredentialSource::dictionary(&users, &passwords).unwrap();
        assert_eq!(collect(&first), collect(&second));
    }

    #[test]
    fn iteration_restarts_from_scratch() {
        let source = CredentialSource::SingleUser {
            username: "root".into(),
            passwords: vec!["a".into(), "b".into()],
        };

        let mut iter = source.iter();
        iter.next();
        assert_eq!(iter.len(), 1);
        assert_eq!(source.iter().count(), 2);
    }
}
