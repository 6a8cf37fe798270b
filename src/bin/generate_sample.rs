use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const SPECTRUM_ID: &str = "sample-13c";
const N_POINTS: usize = 8192;
const PPM_START: f64 = 220.0;
const PPM_END: f64 = -10.0;

fn lorentzian(x: f64, center: f64, half_width: f64, amplitude: f64) -> f64 {
    let d = (x - center) / half_width;
    amplitude / (1.0 + d * d)
}

fn generate_spectrum(
    ppm: &[f64],
    lines: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    ppm.iter()
        .map(|&x| {
            let signal: f64 = lines
                .iter()
                .map(|&(center, hw, amp)| lorentzian(x, center, hw, amp))
                .sum();
            signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let step = (PPM_START - PPM_END) / (N_POINTS - 1) as f64;
    let ppm: Vec<f64> = (0..N_POINTS).map(|i| PPM_START - i as f64 * step).collect();

    // Menthol-like 13C lines plus the CDCl3 triplet; one negative line so
    // the mirrored-trace pick has something to find.
    let lines = [
        (77.36, 0.04, 0.6),
        (77.16, 0.04, 0.6),
        (76.84, 0.04, 0.6),
        (71.52, 0.05, 1.0),
        (50.14, 0.05, 0.9),
        (45.04, 0.05, 0.85),
        (34.56, 0.05, 0.95),
        (31.66, 0.05, 0.8),
        (25.83, 0.05, 0.9),
        (23.14, 0.05, 0.85),
        (22.24, 0.05, 1.0),
        (21.00, 0.05, 0.95),
        (16.11, 0.05, 0.9),
        (128.30, 0.05, -0.7),
    ];
    let intensity = generate_spectrum(&ppm, &lines, 0.01, &mut rng);

    // Write Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("ppm", DataType::Float64, false),
        Field::new("intensity", DataType::Float64, false),
        Field::new("id", DataType::Utf8, false),
        Field::new("label", DataType::Utf8, false),
        Field::new("solvent", DataType::Utf8, false),
        Field::new("frequency", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(ppm.clone())),
            Arc::new(Float64Array::from(intensity.clone())),
            Arc::new(StringArray::from(vec![SPECTRUM_ID; N_POINTS])),
            Arc::new(StringArray::from(vec!["13C"; N_POINTS])),
            Arc::new(StringArray::from(vec!["CDCl3"; N_POINTS])),
            Arc::new(Float64Array::from(vec![100.6; N_POINTS])),
        ],
    )?;

    let parquet_path = "sample_13c.parquet";
    let file = std::fs::File::create(parquet_path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    // Write JSON
    let json_path = "sample_13c.json";
    let doc = json!({
        "id": SPECTRUM_ID,
        "ppm": ppm,
        "intensity": intensity,
        "label": "13C",
        "frequency": 100.6,
        "solvent": "CDCl3",
    });
    std::fs::write(json_path, serde_json::to_string(&doc)?)?;

    println!("Wrote {N_POINTS}-point 13C spectrum to {parquet_path} and {json_path}");
    Ok(())
}
