/// Values the command line uses when neither the configuration file nor a flag sets them.
///
/// Analysis parameters fall through to the engine's own defaults.
pub struct DefaultsConfig {
    pub input_dir: &'static str,
    pub write_attributes: bool,
    pub launch_viewer: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_dir: ".",
            write_attributes: true,
            launch_viewer: false,
        }
    }
}
