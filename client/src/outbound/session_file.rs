//! JSON file adapter for the `SessionPersistence` port.
//!
//! The session lives in a single JSON document opened through a `cap_std`
//! directory handle. Writes go to a hidden temporary file in the same
//! directory and are renamed over the target, so a crash never leaves a
//! half-written session behind. The password is never written.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{SessionPersistence, SessionPersistenceError};
use crate::domain::{User, UserId, UserProfile};

const FORMAT_VERSION: u32 = 1;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize)]
struct StoredSessionDto {
    version: u32,
    user: StoredUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredUserDto {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    gender: String,
    username: String,
}

impl From<&User> for StoredSessionDto {
    fn from(user: &User) -> Self {
        Self {
            version: FORMAT_VERSION,
            user: StoredUserDto {
                id: user.id().to_string(),
                email: user.email().to_owned(),
                first_name: user.first_name().to_owned(),
                last_name: user.last_name().to_owned(),
                gender: user.gender().to_owned(),
                username: user.username().to_owned(),
            },
        }
    }
}

impl StoredSessionDto {
    fn into_user(self) -> Result<User, SessionPersistenceError> {
        if self.version != FORMAT_VERSION {
            return Err(SessionPersistenceError::corrupt(format!(
                "unsupported session format version {}",
                self.version
            )));
        }
        let StoredUserDto {
            id,
            email,
            first_name,
            last_name,
            gender,
            username,
        } = self.user;
        let id = UserId::new(id).map_err(|err| SessionPersistenceError::corrupt(err.to_string()))?;
        Ok(User::new(
            id,
            UserProfile {
                email,
                first_name,
                last_name,
                gender,
                username,
            },
        ))
    }
}

/// Session persistence backed by one JSON file.
#[derive(Debug)]
pub struct FileSessionPersistence {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
}

impl FileSessionPersistence {
    /// Open (creating parent directories as needed) the session file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionPersistenceError::Io`] when `path` has no file name or
    /// its directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, SessionPersistenceError> {
        let file_name = path.file_name().ok_or_else(|| {
            SessionPersistenceError::io(format!("session path {path} must name a file"))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| io_error(parent, &err))?;
        let dir =
            Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| io_error(parent, &err))?;
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
            path: path.to_path_buf(),
        })
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SessionPersistence for FileSessionPersistence {
    fn load(&self) -> Result<Option<User>, SessionPersistenceError> {
        let contents = match self.dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&self.path, &err)),
        };
        let stored: StoredSessionDto = serde_json::from_str(&contents)
            .map_err(|err| SessionPersistenceError::corrupt(format!("{}: {err}", self.path)))?;
        stored.into_user().map(Some)
    }

    fn save(&self, user: &User) -> Result<(), SessionPersistenceError> {
        let contents = serde_json::to_string_pretty(&StoredSessionDto::from(user))
            .map_err(|err| SessionPersistenceError::io(err.to_string()))?;
        write_atomic(&self.dir, &self.file_name, &contents)
            .map_err(|err| io_error(&self.path, &err))
    }

    fn clear(&self) -> Result<(), SessionPersistenceError> {
        match self.dir.remove_file(&self.file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&self.path, &err)),
        }
    }
}

fn io_error(path: &Utf8Path, err: &io::Error) -> SessionPersistenceError {
    SessionPersistenceError::io(format!("{path}: {err}"))
}

fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{file_name}.tmp.{}.{nanos}.{counter}", std::process::id());

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let written = dir.open_with(&tmp_name, &options).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });
    let renamed = written.and_then(|()| replace(dir, &tmp_name, file_name));
    if renamed.is_err() {
        drop(dir.remove_file(&tmp_name));
    }
    renamed?;

    // Directory sync is best effort.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

#[cfg(test)]
mod tests {
    //! Round trips through a temporary directory.
    use super::*;
    use crate::test_support::sample_user;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct SessionFile {
        _dir: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn session_file() -> SessionFile {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        SessionFile {
            path: root.join("nested").join("session.json"),
            _dir: dir,
        }
    }

    fn read(path: &Utf8Path) -> String {
        std::fs::read_to_string(path).expect("read session file")
    }

    #[rstest]
    fn missing_file_means_signed_out(session_file: SessionFile) {
        let persistence = FileSessionPersistence::open(&session_file.path).expect("open");
        assert_eq!(persistence.load().expect("load"), None);
    }

    #[rstest]
    fn saved_users_load_back_without_password(session_file: SessionFile) {
        let persistence = FileSessionPersistence::open(&session_file.path).expect("open");
        let user = sample_user();
        persistence.save(&user).expect("save");

        let contents = read(persistence.path());
        assert!(!contents.contains("asdasdasdasda"));
        assert!(!contents.contains("password"));

        let loaded = persistence.load().expect("load").expect("user stored");
        assert_eq!(loaded, user.without_password());
    }

    #[rstest]
    fn saving_twice_replaces_the_session(session_file: SessionFile) {
        let persistence = FileSessionPersistence::open(&session_file.path).expect("open");
        let first = sample_user();
        let second = User::new(
            UserId::new("77").expect("id"),
            UserProfile {
                email: "other@mail.com".to_owned(),
                ..UserProfile::default()
            },
        );
        persistence.save(&first).expect("save first");
        persistence.save(&second).expect("save second");

        assert_eq!(persistence.load().expect("load"), Some(second));
        let leftovers: Vec<_> = std::fs::read_dir(session_file.path.parent().expect("parent"))
            .expect("list dir")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[rstest]
    fn clear_removes_the_file_and_tolerates_absence(session_file: SessionFile) {
        let persistence = FileSessionPersistence::open(&session_file.path).expect("open");
        persistence.save(&sample_user()).expect("save");
        persistence.clear().expect("clear");
        assert_eq!(persistence.load().expect("load"), None);
        persistence.clear().expect("second clear");
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"version":2,"user":{"id":"1","email":"","first_name":"","last_name":"","gender":"","username":""}}"#)]
    #[case(r#"{"version":1,"user":{"id":"","email":"","first_name":"","last_name":"","gender":"","username":""}}"#)]
    fn unreadable_sessions_are_corrupt(session_file: SessionFile, #[case] contents: &str) {
        let persistence = FileSessionPersistence::open(&session_file.path).expect("open");
        std::fs::write(persistence.path(), contents).expect("write");
        let error = persistence.load().expect_err("corrupt session");
        assert!(matches!(error, SessionPersistenceError::Corrupt { .. }));
    }
}
