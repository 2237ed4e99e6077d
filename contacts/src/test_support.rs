//! Shared test fixtures for unit tests and the `tests/` suites.
//!
//! Compiled for tests or with the `test-support` feature.

pub mod scratch {
    //! Throwaway snapshot directories.
    //!
    //! File access goes through `cap_std::fs::Dir` rather than `std::fs`, the
    //! same way the persistence adapter does it.

    use std::io;
    use std::path::{Path, PathBuf};

    use cap_std::{ambient_authority, fs::Dir};
    use tempfile::TempDir;

    /// Temporary directory removed when dropped.
    #[derive(Debug)]
    pub struct ScratchDir {
        root: TempDir,
        dir: Dir,
    }

    impl ScratchDir {
        /// Create an empty scratch directory.
        ///
        /// # Errors
        ///
        /// Returns the underlying IO error when the directory cannot be
        /// created or opened.
        pub fn new() -> io::Result<Self> {
            let root = TempDir::new()?;
            let dir = Dir::open_ambient_dir(root.path(), ambient_authority())?;
            Ok(Self { root, dir })
        }

        /// Absolute path of `name` inside the scratch directory.
        pub fn path(&self, name: &str) -> PathBuf {
            self.root.path().join(name)
        }

        /// Read `name` as UTF-8, typically to inspect a saved snapshot.
        ///
        /// ```rust
        /// use contacts::test_support::scratch::ScratchDir;
        ///
        /// let scratch = ScratchDir::new()?;
        /// scratch.write("contacts.json", b"[]")?;
        /// assert_eq!(scratch.read("contacts.json")?, "[]");
        /// # Ok::<(), std::io::Error>(())
        /// ```
        pub fn read(&self, name: &str) -> io::Result<String> {
            self.dir.read_to_string(Path::new(name))
        }

        /// Write `contents` to `name`, replacing any existing file.
        pub fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
            self.dir.write(Path::new(name), contents)
        }

        /// Whether `name` exists.
        pub fn exists(&self, name: &str) -> bool {
            self.dir.exists(Path::new(name))
        }

        /// Create the sub-directory `name` and return its path.
        pub fn create_subdir(&self, name: &str) -> io::Result<PathBuf> {
            self.dir.create_dir_all(Path::new(name))?;
            Ok(self.path(name))
        }

        /// Remove the sub-directory `name` and everything below it.
        pub fn remove_subdir(&self, name: &str) -> io::Result<()> {
            self.dir.remove_dir_all(Path::new(name))
        }
    }
}

pub mod gateway {
    //! Hand-written remote gateway double.
    //!
    //! `mockall` expectations resolve immediately; this double can also
    //! never resolve, which is how tests show that local reads do not wait
    //! on the network.

    use std::future;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;

    use crate::domain::ports::{RemoteContact, RemoteContactGateway, TransportError};
    use crate::domain::{Contact, RemoteResult};

    #[derive(Debug, Clone)]
    enum Script {
        Offline,
        Hang,
        Serve(Vec<RemoteContact>),
    }

    /// Gateway whose behaviour is fixed at construction.
    ///
    /// Every call is recorded by operation name.
    #[derive(Debug)]
    pub struct ScriptedGateway {
        script: Script,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedGateway {
        fn with_script(script: Script) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails with an unreachable host.
        pub fn offline() -> Self {
            Self::with_script(Script::Offline)
        }

        /// Every call stays pending forever.
        pub fn hanging() -> Self {
            Self::with_script(Script::Hang)
        }

        /// `get_all` returns `records`; writes echo their input with
        /// success.
        pub fn serving(records: Vec<RemoteContact>) -> Self {
            Self::with_script(Script::Serve(records))
        }

        /// Operation names in call order.
        pub fn calls(&self) -> Vec<&'static str> {
            self.lock_calls().clone()
        }

        fn lock_calls(&self) -> MutexGuard<'_, Vec<&'static str>> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner)
        }

        async fn respond<T>(
            &self,
            operation: &'static str,
            serve: impl FnOnce(&[RemoteContact]) -> T,
        ) -> RemoteResult<T> {
            self.lock_calls().push(operation);
            match &self.script {
                Script::Offline => RemoteResult::Exception(TransportError::unresolvable_host(
                    "scripted gateway is offline",
                )),
                Script::Hang => future::pending().await,
                Script::Serve(records) => RemoteResult::Success(serve(records)),
            }
        }
    }

    #[async_trait]
    impl RemoteContactGateway for ScriptedGateway {
        async fn get_all(&self) -> RemoteResult<Vec<RemoteContact>> {
            self.respond("get_all", <[RemoteContact]>::to_vec).await
        }

        async fn search(&self, _query: &str) -> RemoteResult<Vec<RemoteContact>> {
            self.respond("search", <[RemoteContact]>::to_vec).await
        }

        async fn create(&self, contact: &Contact) -> RemoteResult<RemoteContact> {
            let echoed = RemoteContact::from(contact.clone());
            self.respond("create", move |_| echoed).await
        }

        async fn update(&self, contact: &Contact) -> RemoteResult<RemoteContact> {
            let echoed = RemoteContact::from(contact.clone());
            self.respond("update", move |_| echoed).await
        }

        async fn delete(&self, _id: i64) -> RemoteResult<()> {
            self.respond("delete", |_| ()).await
        }

        async fn delete_many(&self, _contacts: &[Contact]) -> RemoteResult<()> {
            self.respond("delete_many", |_| ()).await
        }
    }
}
