use {
    colored::Colorize,
    env_logger::Builder,
    log::*,
    std::io::Write,
};

pub const BANNER: &str = r#"
                   ,,  ,,
         `7MMF'   db `7MM
           MM         MM
 `7M'   `MF'MM  `7MM  MM        `7Mb,od8 ,pP'
   VA   ,V  MM    MM  MM          MM' "' 8I
    VA ,V   MM    MM  MM      mmm MM     `Yb.
     VVV    MM    MM  MM          MM     ,'8b
      W   .JMML..JMML.JMML.     .JMML.   8  YP
            veil-rs :: registry self-detachment demo
"#;

/// Initializes the logger with the specified verbosity level.
///
/// # Parameters
///
/// - `verbose` - A `u8` representing the verbosity level.
///    - `0` for `Info` level.
///    - Any non-zero value for `Debug` level.
///
pub fn init_logger(verbose: u8) {
    let mut builder = Builder::new();
    let log_level = match verbose {
        0 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    builder
        .filter(None, log_level)
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S");
            let level = match record.level() {
                Level::Error => "ERROR".red().bold(),
                Level::Warn => "WARN ".yellow().bold(),
                Level::Info => "INFO ".green(),
                Level::Debug => "DEBUG".bright_black(),
                Level::Trace => "TRACE".blue(),
            };

            writeln!(buf, "[{}] {} [veil] {}", timestamp, level, record.args())
        })
        .init();
}
