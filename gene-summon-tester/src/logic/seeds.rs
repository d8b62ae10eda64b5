use anyhow::{Result, bail};

const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into unique numeric seeds, preserving order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let Ok(seed) = token.parse::<u64>() else {
            bail!("Unrecognized seed token: {token}");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_and_dedupes_numeric_seeds() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "7", "42", "18446744073709551615"])).unwrap();
        assert_eq!(seeds, vec![42, 7, u64::MAX]);
    }

    #[test]
    fn rejects_negative_seeds() {
        let err = resolve_seed_inputs(&tokens(&["1", "-7"])).unwrap_err();
        assert!(err.to_string().contains("-7"));
    }

    #[test]
    fn falls_back_to_default_seed() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_words() {
        assert!(resolve_seed_inputs(&tokens(&["banana"])).is_err());
    }
}
