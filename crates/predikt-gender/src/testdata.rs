use predikt_embed::EmbedderConfig;

use crate::config::{GenderConfig, TrackingConfig};

const FEMALE: [&str; 12] = [
    "Maria", "Ana", "Julia", "Laura", "Sofia", "Clara", "Helena", "Alice", "Beatriz", "Luana", "Marina", "Paula",
];
const MALE: [&str; 12] = [
    "Joao", "Pedro", "Lucas", "Mateus", "Gabriel", "Rafael", "Bruno", "Tiago", "Daniel", "Carlos", "Marcos", "Felipe",
];
const COMPANIES: [&str; 3] = ["4You", "Acme", "Monsters CYA"];

/// users.csv with 24 male and 24 female rows plus a few unusable genders.
pub fn users_csv() -> String {
    let mut out = String::from("code,company,name,gender,age\n");
    for round in 0..2 {
        for i in 0..12 {
            let company = COMPANIES[(i + round) % 3];
            out.push_str(&format!(
                "{},{},{} Silva,female,{}\n",
                i % 4,
                company,
                FEMALE[i],
                21 + (i * 3 + round) % 40
            ));
            out.push_str(&format!(
                "{},{},{} Souza,male,{}\n",
                10 + i % 4,
                company,
                MALE[i],
                23 + (i * 5 + round) % 40
            ));
        }
    }
    out.push_str("3,Acme,Alex Lima,none,30\n");
    out.push_str("3,Acme,Sam Costa,,31\n");
    out
}

/// Small, fast settings: 32-dim hashing embedder and 5 PCA components.
pub fn small_config() -> GenderConfig {
    GenderConfig {
        embedder: EmbedderConfig::Hashing {
            dimension: 32,
            ngram_min: 1,
            ngram_max: 3,
        },
        pca_components: 5,
        tracking: TrackingConfig {
            enabled: false,
            ..TrackingConfig::default()
        },
        ..GenderConfig::default()
    }
}
