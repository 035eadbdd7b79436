use semver::{BuildMetadata, Version};

/// VersionSelector service for comparing loosely formatted version strings
///
/// Registries publish versions that are not valid semver (`1.2`,
/// `1.5.2.RELEASE`, `2.0.0-beta`). Every string is coerced to a
/// `semver::Version`: up to three leading numeric components fill
/// major/minor/patch (missing ones are zero) and whatever follows is kept as
/// build metadata, so `1.5.2.RELEASE` orders after `1.5.2`. Empty strings and
/// the `-1` placeholder coerce to `0.0.0`.
pub struct VersionSelector;

impl VersionSelector {
    /// Coerces a raw version string into a comparable semver version
    pub fn coerce(raw: &str) -> Version {
        let raw = raw.trim().trim_start_matches(['v', 'V']);
        if raw.is_empty() || raw == "-1" {
            return Version::new(0, 0, 0);
        }

        let mut numbers = [0u64; 3];
        let mut rest = raw;
        for slot in numbers.iter_mut() {
            let digits = rest.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                break;
            }
            *slot = rest[..digits].parse().unwrap_or(u64::MAX);
            rest = &rest[digits..];
            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }

        let mut version = Version::new(numbers[0], numbers[1], numbers[2]);
        version.build = Self::build_metadata(rest);
        version
    }

    /// Turns the non-numeric tail into valid build metadata
    fn build_metadata(tail: &str) -> BuildMetadata {
        let sanitized: String = tail
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '.' })
            .collect();
        let identifiers: Vec<&str> = sanitized.split('.').filter(|s| !s.is_empty()).collect();
        if identifiers.is_empty() {
            return BuildMetadata::EMPTY;
        }
        BuildMetadata::new(&identifiers.join(".")).unwrap_or(BuildMetadata::EMPTY)
    }

    /// Picks the highest of the given versions
    ///
    /// `candidates` are listed by preference: when two coerce to the same
    /// value the earlier one wins, and `current` loses every tie. Returns an
    /// empty string when nothing coerces above `0.0.0`.
    pub fn select_latest(current: &str, candidates: &[&str]) -> String {
        let zero = Version::new(0, 0, 0);
        let mut best: Option<(&str, Version)> = None;

        for raw in candidates.iter().copied().chain(std::iter::once(current)) {
            let coerced = Self::coerce(raw);
            let replace = match &best {
                Some((_, best_version)) => coerced > *best_version,
                None => true,
            };
            if replace {
                best = Some((raw, coerced));
            }
        }

        match best {
            Some((raw, version)) if version > zero => raw.to_string(),
            _ => String::new(),
        }
    }

    /// Highest candidate strictly newer than `current`
    ///
    /// Returns `None` when no candidate coerces above the current version.
    /// Among candidates that coerce equal the first one listed is returned.
    pub fn select_recommended(current: &str, candidates: &[String]) -> Option<String> {
        let mut best_version = Self::coerce(current);
        let mut best: Option<&String> = None;

        for candidate in candidates {
            let coerced = Self::coerce(candidate);
            if coerced > best_version {
                best_version = coerced;
                best = Some(candidate);
            }
        }

        best.cloned()
    }
}
