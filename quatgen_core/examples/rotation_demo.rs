// examples/rotation_demo.rs

use quatgen_core::{generate, GeneratorConfig, Quaternion, Simplification};
use std::f64::consts::PI;

fn main() {
    println!("=== Quatgen - Quaternion Döndürme Demo ===");
    println!();

    // 1. Temel çarpım testi
    println!("1. Temel Çarpım Kuralları:");
    let [i, j, k] = Quaternion::<f64>::basis_vectors();
    println!("   i * i = {}", i * i);
    println!("   i * j = {}", i * j);
    println!("   j * i = {}", j * i);
    println!("   j * k = {}", j * k);
    println!();

    // 2. Sayısal döndürme
    println!("2. Vektör Döndürme Demo'su:");
    let v = Quaternion::vector(1.0, 0.0, 0.0);
    for (name, axis) in [("X", (1.0, 0.0, 0.0)), ("Y", (0.0, 1.0, 0.0)), ("Z", (0.0, 0.0, 1.0))] {
        let q = Quaternion::from_axis_angle(PI / 2.0, axis.0, axis.1, axis.2);
        let r = q.rotate(&v);
        println!("   {}-ekseni 90°: ({:.3}, {:.3}, {:.3})", name, r.x, r.y, r.z);
    }
    println!();

    // 3. Sembolik döndürme matrisi
    println!("3. Sembolik Sütunlar (birim norm ile sadeleştirilmiş):");
    let cfg = GeneratorConfig {
        simplification: Simplification::UnitNorm,
        ..GeneratorConfig::default()
    };
    match generate(&cfg) {
        Ok(text) => {
            for line in text.lines() {
                println!("   {}", line);
            }
        }
        Err(e) => eprintln!("   hata: {}", e),
    }
}
