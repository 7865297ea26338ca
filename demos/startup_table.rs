use fixed_map::{FixedMap, MapError};
use std::sync::LazyLock;
use std::time::Instant;

/// HTTP status reason phrases, built once on first use and shared read-only.
static REASONS: LazyLock<Result<FixedMap<u16, &'static str, 8, u8>, MapError>> = LazyLock::new(|| {
    FixedMap::new([
        (200, "OK"),
        (201, "Created"),
        (204, "No Content"),
        (301, "Moved Permanently"),
        (400, "Bad Request"),
        (404, "Not Found"),
        (500, "Internal Server Error"),
        (503, "Service Unavailable"),
    ])
});

fn main() -> Result<(), MapError> {
    let t0 = Instant::now();
    let reasons = REASONS.as_ref().map_err(Clone::clone)?;
    println!("build:  {:?}", t0.elapsed());
    println!(
        "layout: {} slots, pivot {:?}, {} collisions (u8 hash)",
        reasons.len(),
        reasons.pivot(),
        reasons.collision_count()
    );

    let handles: Vec<_> = [200u16, 404, 418, 503]
        .into_iter()
        .map(|code| {
            std::thread::spawn(move || {
                let reasons = REASONS.as_ref().ok()?;
                Some((code, reasons.get(&code).copied()))
            })
        })
        .collect();
    for h in handles {
        if let Ok(Some((code, reason))) = h.join() {
            println!("{code} -> {}", reason.unwrap_or("<unknown>"));
        }
    }
    Ok(())
}
