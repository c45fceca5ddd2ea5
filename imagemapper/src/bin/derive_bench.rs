use imagemapper::{
    Area, ImageMap, ImageMapper, MapperEvents, MapperProps, Recompute, Shape, Surface, SurfaceSize,
};
use std::time::Instant;

struct NullSurface;

impl Surface for NullSurface {
    fn force_image_size(&mut self, _width: Option<f64>, _height: Option<f64>) {}
    fn measure_image(&self) -> SurfaceSize {
        SurfaceSize { width: 1024.0, height: 768.0 }
    }
    fn apply_size(&mut self, _size: SurfaceSize) {}
}

struct Quiet;
impl MapperEvents<()> for Quiet {}

fn build_map(areas: usize, verts: usize) -> ImageMap {
    let mut out = Vec::with_capacity(areas);
    for i in 0..areas {
        let ox = (i % 100) as f64 * 10.0;
        let oy = (i / 100) as f64 * 10.0;
        let area = match i % 3 {
            0 => Area::new(Shape::Rect, vec![ox, oy, ox + 8.0, oy + 8.0]),
            1 => Area::new(Shape::Circle, vec![ox + 4.0, oy + 4.0, 3.0]),
            _ => {
                let mut c = Vec::with_capacity(verts * 2);
                for k in 0..verts {
                    let t = k as f64 / verts as f64 * std::f64::consts::TAU;
                    c.push(ox + 4.0 + 4.0 * t.cos());
                    c.push(oy + 4.0 + 4.0 * t.sin());
                }
                Area::new(Shape::Poly, c)
            }
        };
        out.push(area);
    }
    ImageMap { name: "bench".into(), areas: out }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut areas = 2000usize;
    let mut verts = 16usize;
    let mut iters = 200usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--areas=") { if let Ok(v)=val.parse() { areas=v; } }
        else if let Some(val)=a.strip_prefix("--verts=") { if let Ok(v)=val.parse() { verts=v; } }
        else if let Some(val)=a.strip_prefix("--iters=") { if let Ok(v)=val.parse() { iters=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let map = build_map(areas, verts);
    let mut mapper = ImageMapper::new(MapperProps::new("bench.png").with_map(map));
    let mut surface = NullSurface;
    mapper.mount(&mut surface, &Quiet);

    // Alternate the display width so every update is dirty.
    let mut times_ms: Vec<f64> = Vec::with_capacity(iters);
    let mut skipped = 0usize;
    for k in 0..iters {
        let mut next = mapper.props().clone();
        next.img_width = Some(1000.0);
        next.width = Some(if k % 2 == 0 { 500.0 } else { 750.0 });
        let t0 = Instant::now();
        if mapper.update(next, &mut surface, &Quiet) == Recompute::Skipped { skipped += 1; }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    // Unchanged props must be a cheap skip.
    let t0 = Instant::now();
    let same = mapper.props().clone();
    let skip = mapper.update(same, &mut surface, &Quiet);
    let skip_ms = t0.elapsed().as_secs_f64() * 1000.0;

    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("areas={} verts={} iters={} skipped={} median_ms={:.4} p90_ms={:.4} p99_ms={:.4} skip={:?} skip_ms={:.4}", areas, verts, iters, skipped, med, p90, p99, skip, skip_ms);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
