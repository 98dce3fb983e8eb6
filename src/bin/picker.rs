use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pixel_picker::{PickerEngine, RendererConfig};

struct Args {
    image: PathBuf,
    width: u32,
    height: u32,
    pixel: Option<(u32, u32)>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut out = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--out" {
            out = Some(PathBuf::from(
                args.next().context("--out needs a file path")?,
            ));
        } else {
            positional.push(arg);
        }
    }

    if positional.is_empty() {
        bail!("usage: picker <image> [width height [x y]] [--out target.png]");
    }

    let image = PathBuf::from(&positional[0]);
    let (width, height) = match (positional.get(1), positional.get(2)) {
        (Some(w), Some(h)) => (w.parse()?, h.parse()?),
        _ => (1200, 800),
    };
    let pixel = match (positional.get(3), positional.get(4)) {
        (Some(x), Some(y)) => Some((x.parse()?, y.parse()?)),
        _ => None,
    };

    Ok(Args {
        image,
        width,
        height,
        pixel,
        out,
    })
}

fn build_device() -> Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        force_fallback_adapter: false,
        compatible_surface: None,
    }))
    .context("no suitable GPU adapter")?;
    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
            memory_hints: Default::default(),
        },
        None,
    ))
    .context("failed to create device")?;
    Ok((device, queue))
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_module("pixel_picker", log::LevelFilter::Info)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let args = parse_args()?;
    let (device, queue) = build_device()?;

    let mut engine = PickerEngine::new(device, queue, RendererConfig::default())?;
    engine.render_image(args.width, args.height, &args.image)?;

    if let Some((w, h)) = engine.image_size()? {
        log::info!("rendered {} ({w}x{h})", args.image.display());
    }

    if let Some((x, y)) = args.pixel {
        let color = engine.read_pixel(x, y)?;
        println!(
            "pixel ({x}, {y}): rgba({:.4}, {:.4}, {:.4}, {:.4})",
            color.r, color.g, color.b, color.a
        );
    }

    if let Some(out) = &args.out {
        engine
            .save_target_png(out)
            .map_err(|e| anyhow::anyhow!(e))?;
        println!("target written to {}", out.display());
    }

    engine.terminate();
    Ok(())
}
