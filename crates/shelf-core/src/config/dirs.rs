use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following XDG spec
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/shelf)
    pub config: PathBuf,

    /// Data directory (~/.local/share/shelf)
    pub data: PathBuf,

    /// Cache directory (~/.cache/shelf)
    pub cache: PathBuf,

    /// Preference store file
    pub prefs_file: PathBuf,

    /// Channel provider documents
    pub channels_dir: PathBuf,

    /// Installed application documents
    pub apps_dir: PathBuf,

    /// Continue-watching program listing
    pub watch_next_file: PathBuf,

    /// Launch handler table
    pub handlers_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project =
            ProjectDirs::from("", "", "shelf").expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();
        let cache = project.cache_dir().to_path_buf();

        Self {
            prefs_file: data.join("prefs"),
            channels_dir: data.join("channels"),
            apps_dir: data.join("apps"),
            watch_next_file: data.join("watch_next.json"),
            handlers_file: config.join("handlers.json"),
            config,
            data,
            cache,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            prefs_file: base.join("prefs"),
            channels_dir: base.join("channels"),
            apps_dir: base.join("apps"),
            watch_next_file: base.join("watch_next.json"),
            handlers_file: base.join("handlers.json"),
            config: base.clone(),
            data: base.clone(),
            cache: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        std::fs::create_dir_all(&self.cache)?;
        std::fs::create_dir_all(&self.channels_dir)?;
        std::fs::create_dir_all(&self.apps_dir)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
