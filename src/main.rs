use log::{LevelFilter, Log, Metadata, Record};
use songbook::Settings;
use std::env;
use std::fs;
use std::process;

const USAGE: &str = "Usage: songbook [--no-chords] [--font-size N] [--settings FILE] [--no-validate] <input.cho> [output.html]";

/// Writes log records to stderr; the level comes from `SONGBOOK_LOG`
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = env::var("SONGBOOK_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut settings_path: Option<&String> = None;
    let mut font_size: Option<u32> = None;
    let mut no_chords = false;
    let mut no_validate = false;
    let mut positional: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--no-chords" => no_chords = true,
            "--no-validate" => no_validate = true,
            "--font-size" => {
                let value = iter.next().unwrap_or_else(|| fail(USAGE));
                font_size = Some(
                    value
                        .parse()
                        .unwrap_or_else(|_| fail(format!("Invalid font size '{}'", value))),
                );
            }
            "--settings" => {
                settings_path = Some(iter.next().unwrap_or_else(|| fail(USAGE)));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ => positional.push(arg),
        }
    }

    let (input_path, output_path) = match positional.as_slice() {
        [input] => (*input, None),
        [input, output] => (*input, Some(*output)),
        _ => fail(USAGE),
    };

    // Settings: file first, then flags on top
    let mut settings = match settings_path {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("Error reading settings '{}': {}", path, e)));
            Settings::from_yaml(&yaml).unwrap_or_else(|e| fail(e))
        }
        None => Settings::default(),
    };
    if let Some(size) = font_size {
        settings.font_size_px = size;
    }
    if no_chords {
        settings.show_chords = false;
    }

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => fail(format!("Error reading file '{}': {}", input_path, e)),
    };

    // Render
    let result = if no_validate {
        songbook::render_song_unchecked(&source, &settings)
    } else {
        songbook::render_song(&source, &settings)
    };

    let html = match result {
        Ok(html) => html,
        Err(e) => fail(format!("Render error: {}", e)),
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &html) {
                fail(format!("Error writing to '{}': {}", path, e));
            }
            eprintln!("Wrote HTML to {}", path);
        }
        None => {
            print!("{}", html);
        }
    }
}
