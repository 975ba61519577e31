//! Interactive prompting for video options.
//!
//! Used only when stdin is a terminal and no video flags were given;
//! scripted runs always take the configured defaults.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Prompt for a value, returning `default` on an empty answer.
fn ask(prompt: &str, default: &str) -> io::Result<String> {
    print!("{} [{}]: ", prompt, default);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Default image directory offered when none was given on the command
/// line.
pub const DEFAULT_IMAGE_DIR: &str = "./images";

/// Prompt for the image directory.
pub fn prompt_image_dir() -> io::Result<PathBuf> {
    Ok(PathBuf::from(ask("Image directory", DEFAULT_IMAGE_DIR)?))
}

/// Prompt for a yes/no answer, defaulting to no.
fn ask_yes_no(prompt: &str) -> io::Result<bool> {
    let answer = ask(prompt, "n")?;
    Ok(matches!(answer.as_str(), "y" | "Y" | "yes" | "Yes"))
}

/// Video options collected interactively or from defaults.
#[derive(Debug, Clone)]
pub struct VideoOptions {
    pub output: PathBuf,
    pub duration_secs: f64,
    pub fps: u32,
    pub bgm: Option<PathBuf>,
    pub narrate: bool,
    pub voice: Option<String>,
    pub speed: Option<f64>,
}

/// Collect video options from the terminal.
///
/// Invalid numeric answers fall back to the defaults with a note rather
/// than re-prompting. Narration is offered only when synthesis is on the
/// table (`offer_narration` — subtitles present and a synthesis command
/// available); voice and speed are asked only after a yes.
pub fn prompt_video_options(
    default_output: &str,
    default_duration: f64,
    default_fps: u32,
    default_voice: &str,
    default_speed: f64,
    offer_narration: bool,
) -> io::Result<VideoOptions> {
    let output = PathBuf::from(ask("Output filename", default_output)?);

    let duration_answer = ask("Seconds per image", &default_duration.to_string())?;
    let duration_secs = duration_answer.parse().unwrap_or_else(|_| {
        eprintln!("Not a number, using {}", default_duration);
        default_duration
    });

    let fps_answer = ask("Frames per second", &default_fps.to_string())?;
    let fps = fps_answer.parse().unwrap_or_else(|_| {
        eprintln!("Not a number, using {}", default_fps);
        default_fps
    });

    let bgm_answer = ask("Background music file (empty for none)", "")?;
    let bgm = (!bgm_answer.is_empty()).then(|| PathBuf::from(bgm_answer));

    let narrate = offer_narration && ask_yes_no("Synthesize narration from subtitles? (y/n)")?;
    let (voice, speed) = if narrate {
        let voice = ask("Narration voice", default_voice)?;
        let speed_answer = ask("Narration speed", &default_speed.to_string())?;
        let speed = speed_answer.parse().unwrap_or_else(|_| {
            eprintln!("Not a number, using {}", default_speed);
            default_speed
        });
        (Some(voice), Some(speed))
    } else {
        (None, None)
    };

    Ok(VideoOptions {
        output,
        duration_secs,
        fps,
        bgm,
        narrate,
        voice,
        speed,
    })
}
