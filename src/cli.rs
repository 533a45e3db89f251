//! Command-line front end
//!
//! Usage examples:
//!   doodlewhisper mask -i photo.jpg --rect 100,100,200,250 -o mask.png
//!   doodlewhisper edit -i photo.jpg --stroke 40,40 80,60 120,90 -p "a red balloon" -o out.png
//!
//! Coordinates are in display-canvas space, the same space pointer input
//! arrives in.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use image::{DynamicImage, ImageFormat};

use crate::config::EditorConfig;
use crate::core::App;
use crate::domain::{DrawMode, Point, Resolution, SurfaceSize};
use crate::inpaint::RemoteInpaint;
use crate::session::{EditMsg, EditSession, PointerAction, SubmissionStatus};
use crate::source::SourceImage;

/// Mark a region of an image and have it regenerated from a prompt
#[derive(Parser, Debug)]
#[command(name = "doodlewhisper", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to use instead of the per-user one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log submissions and state changes
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the mask for a marked region without contacting the service
    Mask {
        #[command(flatten)]
        region: RegionArgs,

        /// Where to write the grayscale mask PNG
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Submit image, mask and prompt and save the generated image
    Edit {
        #[command(flatten)]
        region: RegionArgs,

        /// What to put in the marked region
        #[arg(short, long)]
        prompt: String,

        /// Where to save the generated image (format from extension)
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Also write the submitted mask here
        #[arg(long, value_name = "FILE")]
        mask_out: Option<PathBuf>,

        /// Relay endpoint, overriding the config
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
    },
}

/// Image and region shared by every subcommand
#[derive(Args, Debug)]
pub struct RegionArgs {
    /// Image to edit
    #[arg(short, long, value_name = "FILE")]
    pub image: PathBuf,

    /// Rectangle as two opposite corners: x0,y0,x1,y1
    #[arg(long, value_parser = parse_corners, conflicts_with = "stroke")]
    pub rect: Option<Corners>,

    /// Free-hand stroke as a list of points: x,y x,y ...
    #[arg(long, value_parser = parse_point, num_args = 1..)]
    pub stroke: Vec<Point>,

    /// Display canvas size, overriding the config: WxH
    #[arg(long, value_parser = parse_resolution, value_name = "WxH")]
    pub display: Option<Resolution>,

    /// Mask resolution, overriding the config: WxH
    #[arg(long, value_parser = parse_resolution, value_name = "WxH")]
    pub target: Option<Resolution>,

    /// Store the effective settings as the per-user config
    #[arg(long)]
    pub save_config: bool,
}

/// Two opposite rectangle corners
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners(pub Point, pub Point);

fn parse_number(s: &str) -> Result<f32, String> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("'{}' is not a finite number", s))
    }
}

pub fn parse_point(s: &str) -> Result<Point, String> {
    match s.split(',').collect::<Vec<_>>().as_slice() {
        [x, y] => Ok(Point::new(parse_number(x)?, parse_number(y)?)),
        _ => Err(format!("expected x,y but got '{}'", s)),
    }
}

pub fn parse_corners(s: &str) -> Result<Corners, String> {
    match s.split(',').collect::<Vec<_>>().as_slice() {
        [x0, y0, x1, y1] => Ok(Corners(
            Point::new(parse_number(x0)?, parse_number(y0)?),
            Point::new(parse_number(x1)?, parse_number(y1)?),
        )),
        _ => Err(format!("expected x0,y0,x1,y1 but got '{}'", s)),
    }
}

pub fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH but got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in '{}'", s))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in '{}'", s))?;
    Resolution::new(w, h).ok_or_else(|| format!("'{}' has a zero dimension", s))
}

impl RegionArgs {
    /// Pointer events that reproduce the marking on the canvas
    fn gesture(&self) -> anyhow::Result<(DrawMode, Vec<PointerAction>)> {
        if let Some(Corners(a, b)) = self.rect {
            return Ok((
                DrawMode::Rectangle,
                vec![
                    PointerAction::Down(a.x, a.y),
                    PointerAction::Move(b.x, b.y),
                    PointerAction::Up,
                ],
            ));
        }
        let Some((first, rest)) = self.stroke.split_first() else {
            bail!("Mark a region with --rect or --stroke");
        };
        let mut actions = vec![PointerAction::Down(first.x, first.y)];
        actions.extend(rest.iter().map(|p| PointerAction::Move(p.x, p.y)));
        actions.push(PointerAction::Up);
        Ok((DrawMode::Freehand, actions))
    }

    fn apply(&self, config: &mut EditorConfig) {
        if let Some(display) = self.display {
            config.display = SurfaceSize::from(display);
        }
        if let Some(target) = self.target {
            config.target = target;
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load_from(path)
            .with_context(|| format!("Failed to read config {}", path.display())),
        None => Ok(EditorConfig::load()),
    }
}

/// Session with the image loaded and the region marked
fn marked_session(
    config: &EditorConfig,
    region: &RegionArgs,
) -> anyhow::Result<(EditSession, Vec<EditMsg>)> {
    let session = EditSession::new(config.session_settings())?;
    let image = SourceImage::open(&region.image)
        .with_context(|| format!("Failed to load {}", region.image.display()))?;
    let (mode, actions) = region.gesture()?;
    let mut msgs = vec![EditMsg::LoadImage(image), EditMsg::ToggleMode(mode)];
    msgs.extend(actions.into_iter().map(EditMsg::Pointer));
    Ok((session, msgs))
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Save the generated image to `out`
///
/// The received bytes are written as-is when `out` names the same format or
/// an unknown one. JPEG has no alpha channel, so it is encoded from RGB.
fn save_generated(generated: &SourceImage, out: &Path) -> anyhow::Result<()> {
    let native = ImageFormat::from_mime_type(&generated.mime);
    let result = match ImageFormat::from_path(out).ok() {
        None => return write_file(out, &generated.bytes),
        Some(format) if Some(format) == native => return write_file(out, &generated.bytes),
        Some(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(generated.rgba.clone())
            .to_rgb8()
            .save(out),
        Some(_) => generated.rgba.save(out),
    };
    result.with_context(|| format!("Failed to save {}", out.display()))
}

/// Run the parsed command
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Mask { region, out } => {
            region.apply(&mut config);
            if region.save_config {
                config.save();
            }
            let (mut session, msgs) = marked_session(&config, &region)?;
            for msg in msgs {
                crate::session::handle_edit_msg(&mut session, msg);
            }
            let Some(mask) = session.preview_mask()? else {
                bail!("No image loaded");
            };
            write_file(&out, &mask.to_png()?)?;
            log::info!(
                "Wrote {} mask with {} marked pixels to {}",
                config.target,
                mask.edit_pixel_count(),
                out.display()
            );
        }
        Command::Edit {
            region,
            prompt,
            out,
            mask_out,
            endpoint,
        } => {
            region.apply(&mut config);
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if region.save_config {
                config.save();
            }
            let (session, msgs) = marked_session(&config, &region)?;
            let backend = RemoteInpaint::new(config.endpoint.clone(), config.request_timeout())?;
            log::info!("Using relay at {}", backend.endpoint());

            let mut app = App::new(session, backend);
            for msg in msgs {
                app.update(msg);
            }
            app.update(EditMsg::PromptChanged(prompt));
            app.update(EditMsg::Submit);
            if let (Some(path), Some(mask)) = (&mask_out, app.session().mask()) {
                write_file(path, &mask.to_png()?)?;
            }
            app.run_until_settled().await;

            match app.session().status() {
                SubmissionStatus::Succeeded => {
                    let Some(image) = app.session().image() else {
                        bail!("Generated image missing from session");
                    };
                    save_generated(image, &out)?;
                    println!("{}", out.display());
                }
                SubmissionStatus::Failed(message) => bail!("Generation failed: {}", message),
                status => bail!("Nothing was submitted ({:?})", status),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20.5"), Ok(Point::new(10.0, 20.5)));
        assert_eq!(parse_point(" 3 , 4 "), Ok(Point::new(3.0, 4.0)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }

    #[test]
    fn test_parse_corners() {
        assert_eq!(
            parse_corners("200,250,100,100"),
            Ok(Corners(Point::new(200.0, 250.0), Point::new(100.0, 100.0)))
        );
        assert!(parse_corners("1,2,3").is_err());
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("512x512"), Ok(Resolution::new(512, 512).unwrap()));
        assert_eq!(parse_resolution("1024X768"), Ok(Resolution::new(1024, 768).unwrap()));
        assert!(parse_resolution("0x512").is_err());
        assert!(parse_resolution("512").is_err());
    }

    #[test]
    fn test_cli_parses_edit_with_stroke() {
        let args = CliArgs::try_parse_from([
            "doodlewhisper",
            "edit",
            "-i",
            "photo.jpg",
            "--stroke",
            "10,10",
            "20,15",
            "-p",
            "a cat",
            "-o",
            "out.png",
        ])
        .unwrap();
        let Command::Edit { region, prompt, .. } = args.command else {
            panic!("expected edit");
        };
        assert_eq!(prompt, "a cat");
        let (mode, actions) = region.gesture().unwrap();
        assert_eq!(mode, DrawMode::Freehand);
        assert_eq!(
            actions,
            vec![
                PointerAction::Down(10.0, 10.0),
                PointerAction::Move(20.0, 15.0),
                PointerAction::Up
            ]
        );
    }

    #[test]
    fn test_cli_rejects_rect_with_stroke() {
        let parsed = CliArgs::try_parse_from([
            "doodlewhisper",
            "mask",
            "-i",
            "photo.jpg",
            "--rect",
            "0,0,10,10",
            "--stroke",
            "1,1",
            "-o",
            "mask.png",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_gesture_requires_region() {
        let args =
            CliArgs::try_parse_from(["doodlewhisper", "mask", "-i", "a.png", "-o", "m.png"]).unwrap();
        let Command::Mask { region, .. } = args.command else {
            panic!("expected mask");
        };
        assert!(region.gesture().is_err());
    }

    #[tokio::test]
    async fn test_mask_command_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.png");
        std::fs::write(&photo, crate::source::tests::sample_png(64, 48)).unwrap();
        let config = dir.path().join("config.json");
        EditorConfig::default().save_to(&config).unwrap();
        let out = dir.path().join("mask.png");

        let photo_arg = photo.to_string_lossy().into_owned();
        let config_arg = config.to_string_lossy().into_owned();
        let out_arg = out.to_string_lossy().into_owned();
        let args = CliArgs::try_parse_from([
            "doodlewhisper",
            "mask",
            "-i",
            &photo_arg,
            "--rect",
            "100,100,200,250",
            "--config",
            &config_arg,
            "-o",
            &out_arg,
        ])
        .unwrap();
        run(args).await.unwrap();

        let mask = image::open(&out).unwrap().to_luma8();
        assert_eq!(mask.dimensions(), (512, 512));
        assert_eq!(mask.get_pixel(150, 200).0, [255]);
        assert_eq!(mask.get_pixel(10, 10).0, [0]);
    }

    #[test]
    fn test_save_generated_keeps_bytes_for_same_format() {
        let dir = tempfile::tempdir().unwrap();
        let png = crate::source::tests::sample_png(10, 6);
        let generated = SourceImage::from_bytes(png.clone(), "generated-image.png").unwrap();

        let out = dir.path().join("result.png");
        save_generated(&generated, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), png);

        let unknown = dir.path().join("result.out");
        save_generated(&generated, &unknown).unwrap();
        assert_eq!(std::fs::read(&unknown).unwrap(), png);
    }

    #[test]
    fn test_save_generated_converts_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let generated =
            SourceImage::from_bytes(crate::source::tests::sample_png(10, 6), "generated-image.png")
                .unwrap();

        let out = dir.path().join("result.jpg");
        save_generated(&generated, &out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 6));
    }
}
