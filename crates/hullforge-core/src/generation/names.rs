//! Name generation utilities

use rand::Rng;

/// Generate a random ship name, e.g. "ISV Meridian"
pub fn generate_ship_name(rng: &mut impl Rng) -> String {
    let prefix = SHIP_PREFIXES[rng.gen_range(0..SHIP_PREFIXES.len())];
    let noun = SHIP_NOUNS[rng.gen_range(0..SHIP_NOUNS.len())];

    format!("{} {}", prefix, noun)
}

static SHIP_PREFIXES: &[&str] = &["ISV", "UNS", "CSV", "HMS", "RSV", "FTV"];

static SHIP_NOUNS: &[&str] = &[
    // Virtues
    "Endurance",
    "Resolute",
    "Tenacity",
    "Valiant",
    "Steadfast",
    "Providence",
    // Celestial
    "Meridian",
    "Perihelion",
    "Zenith",
    "Solstice",
    "Equinox",
    "Corona",
    "Nadir",
    "Parallax",
    // Wildlife
    "Kestrel",
    "Heron",
    "Osprey",
    "Marlin",
    "Albatross",
    "Petrel",
    // Odds and ends
    "Anvil",
    "Lantern",
    "Compass",
    "Tinderbox",
    "Wayfarer",
    "Drift",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_name_has_prefix_and_noun() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let name = generate_ship_name(&mut rng);
            let (prefix, noun) = name.split_once(' ').unwrap();
            assert!(SHIP_PREFIXES.contains(&prefix));
            assert!(SHIP_NOUNS.contains(&noun));
        }
    }

    #[test]
    fn test_same_seed_same_name() {
        let a = generate_ship_name(&mut StdRng::seed_from_u64(99));
        let b = generate_ship_name(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
