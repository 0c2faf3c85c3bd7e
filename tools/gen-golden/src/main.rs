// tools/gen-golden: regenerate testdata/golden/*.bin from synthetic scenes
use std::{fs::File, io::Write, path::Path};
use hog_core::{compute_hog, Channels, HogParams, PixelView};

struct Scene {
    name: &'static str,
    height: usize,
    width: usize,
    channels: Channels,
    params: HogParams,
    pixel: fn(usize, usize, usize) -> f64,
}

fn vertical_edge(x: usize, _y: usize, _c: usize) -> f64 {
    if x < 8 { 0.0 } else { 1.0 }
}

fn disc(x: usize, y: usize, _c: usize) -> f64 {
    let (dx, dy) = (x as f64 - 13.0, y as f64 - 10.0);
    if dx * dx + dy * dy <= 36.0 { 1.0 } else { 0.125 * (x % 4) as f64 }
}

fn color_checker(x: usize, y: usize, c: usize) -> f64 {
    match c {
        0 => ((x / 4 + y / 4) % 2) as f64,
        1 => 0.25 * ((y / 3) % 2) as f64,
        _ => if x + y > 20 { 0.75 } else { 0.0 },
    }
}

fn scenes() -> Vec<Scene> {
    vec![
        Scene {
            name: "vertical_edge",
            height: 16,
            width: 16,
            channels: Channels::Gray,
            params: HogParams::default(),
            pixel: vertical_edge,
        },
        Scene {
            name: "disc_signed",
            height: 20,
            width: 27,
            channels: Channels::Gray,
            params: HogParams::default()
                .with_bins(12)
                .with_cell_width(6.0)
                .with_block_size(3)
                .with_unsigned_dirs(false)
                .with_clip(0.25),
            pixel: disc,
        },
        Scene {
            name: "color_checker",
            height: 24,
            width: 18,
            channels: Channels::Rgb,
            params: HogParams::default().with_cell_width(5.5),
            pixel: color_checker,
        },
    ]
}

fn render(scene: &Scene) -> Vec<f64> {
    let (h, w) = (scene.height, scene.width);
    let mut data = vec![0.0; h * w * scene.channels.count()];
    for c in 0..scene.channels.count() {
        for x in 0..w {
            for y in 0..h {
                data[y + x * h + c * h * w] = (scene.pixel)(x, y, c);
            }
        }
    }
    data
}

fn write_u32(f: &mut File, v: usize) -> std::io::Result<()> {
    f.write_all(&(v as u32).to_le_bytes())
}

fn write_golden(path_out: &Path, scene: &Scene, pixels: &[f64], features: &[f64]) -> std::io::Result<()> {
    let p = &scene.params;
    let mut f = File::create(path_out)?;
    write_u32(&mut f, scene.height)?;
    write_u32(&mut f, scene.width)?;
    write_u32(&mut f, scene.channels.count())?;
    write_u32(&mut f, p.nb_bins)?;
    f.write_all(&p.cell_width.to_le_bytes())?;
    write_u32(&mut f, p.block_size)?;
    write_u32(&mut f, p.unsigned_dirs as usize)?;
    f.write_all(&p.clip_val.to_le_bytes())?;
    for v in pixels {
        f.write_all(&v.to_le_bytes())?;
    }
    write_u32(&mut f, features.len())?;
    for v in features {
        f.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let out_dir = Path::new("testdata/golden");
    std::fs::create_dir_all(out_dir)?;

    for scene in scenes() {
        let pixels = render(&scene);
        let view = PixelView::from_column_major(&pixels, scene.height, scene.width, scene.channels)
            .ok_or_else(|| anyhow::anyhow!("scene {} does not fit its buffer", scene.name))?;
        let features = compute_hog(&view, &scene.params);

        let out = out_dir.join(format!("{}.bin", scene.name));
        write_golden(&out, &scene, &pixels, &features)?;
        println!("golden: {} ({} features) -> {:?}", scene.name, features.len(), out);
    }
    Ok(())
}
