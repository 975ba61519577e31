//! Storyreel command-line interface.
//!
//! Turns a directory of images plus optional subtitles and narration
//! into a single story video with cross-fade transitions, burned-in
//! subtitles, and mixed audio.

mod args;
mod prompts;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use tracing::{debug, warn};

use storyreel_core::config::{ConfigManager, ConfigResult, ConfigSection};
use storyreel_core::logging::{init_tracing, LogConfig, LogLevel, RunLogger};
use storyreel_core::models::{PanDirection, StoryBoard, TransitionStyle, VideoConfig};
use storyreel_core::orchestrator::run_story;
use storyreel_core::tools::FfmpegTools;

use args::Args;
use prompts::{prompt_video_options, VideoOptions};

fn main() -> ExitCode {
    let cli = Args::parse();

    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    match run(cli) {
        Ok(output) => {
            println!("Video created: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Args) -> Result<PathBuf> {
    let mut config_mgr = ConfigManager::new(&cli.config);
    config_mgr
        .load_or_create()
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    config_mgr.ensure_dirs_exist()?;
    let settings = config_mgr.settings().clone();

    // Resolve the transcoding engine before touching any inputs.
    let ffmpeg_override = (!settings.tools.ffmpeg_path.is_empty())
        .then(|| PathBuf::from(&settings.tools.ffmpeg_path));
    let tools = FfmpegTools::locate(ffmpeg_override.as_deref())?;
    debug!("Using ffmpeg at {}", tools.ffmpeg.display());

    let interactive = std::io::stdin().is_terminal() && !cli.has_video_options();
    let image_dir = resolve_image_dir(cli.image_dir.clone(), interactive)?;

    let story = StoryBoard::scan(&image_dir, cli.subtitles, cli.narration)?;

    let defaults = &settings.video;
    let options = if interactive {
        let synthesis_available = story.has_subtitles()
            && storyreel_core::tools::find_synth_command(&settings.narration.command).is_some();
        prompt_video_options(
            &defaults.default_output,
            defaults.default_duration_secs,
            defaults.default_fps,
            &settings.narration.voice,
            settings.narration.speed,
            synthesis_available,
        )
        .context("reading video options")?
    } else {
        VideoOptions {
            output: cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&defaults.default_output)),
            duration_secs: cli.duration.unwrap_or(defaults.default_duration_secs),
            fps: cli.fps.unwrap_or(defaults.default_fps),
            bgm: cli
                .bgm
                .clone()
                .or_else(|| find_default_music(Path::new(&settings.paths.assets_folder))),
            narrate: cli.auto_narration,
            voice: cli.narration_voice.clone(),
            speed: cli.narration_speed,
        }
    };

    if interactive {
        // Chosen options become the defaults offered next run.
        if let Err(e) = persist_video_defaults(&mut config_mgr, &options) {
            warn!(
                "Could not save defaults to {}: {}",
                cli.config.display(),
                e
            );
        }
    }

    let config = VideoConfig::new(
        options.output,
        options.duration_secs,
        options.fps,
        options.bgm,
        PanDirection::default(),
        TransitionStyle::default(),
        options.narrate,
        options.voice.unwrap_or_else(|| settings.narration.voice.clone()),
        options.speed.unwrap_or(settings.narration.speed),
    )?;

    let log_config = LogConfig::from_settings(&settings.logging, cli.verbose);
    let logger = RunLogger::new("storyreel", config_mgr.logs_folder(), log_config)
        .context("creating run logger")?;

    let output = run_story(story, config, settings, tools, Arc::new(logger))?;
    Ok(output)
}

/// Resolve the image directory, prompting for it on an interactive run.
fn resolve_image_dir(cli_dir: Option<PathBuf>, interactive: bool) -> Result<PathBuf> {
    match cli_dir {
        Some(dir) => Ok(dir),
        None if interactive => Ok(prompts::prompt_image_dir()?),
        None => bail!("No image directory given (usage: storyreel <image_dir>)"),
    }
}

/// Write the chosen video options back to the config file so the next
/// run offers them as defaults. Only the `[video]` section is touched.
fn persist_video_defaults(config: &mut ConfigManager, options: &VideoOptions) -> ConfigResult<()> {
    let video = &mut config.settings_mut().video;
    video.default_duration_secs = options.duration_secs;
    video.default_fps = options.fps;
    if let Some(name) = options.output.to_str() {
        video.default_output = name.to_string();
    }
    config.update_section(ConfigSection::Video)
}

/// First `.mp3` (by name) in the assets folder, if the folder exists.
fn find_default_music(assets_dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(assets_dir).ok()?;
    let mut tracks: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
        })
        .collect();
    if tracks.is_empty() {
        return None;
    }
    tracks.sort();
    let track = tracks.remove(0);
    warn!("Using background music from assets: {}", track.display());
    Some(track)
}
