use crate::schedule::DAY;
use crate::types::{ExerciseStyle, ExerciseTerms};

/// Half-width of a European or Bermudan exercise window
pub const WINDOW_WIDTH: u64 = DAY;

/// Construction-time checks. `expiration` must lie in the future; European
/// and Bermudan terms need `now <= start < expiration`, and Bermudan windows
/// must not overlap.
pub fn validate_terms(terms: &ExerciseTerms, now: u64) -> bool {
    if terms.expiration <= now {
        return false;
    }

    match terms.style {
        ExerciseStyle::American => true,
        ExerciseStyle::European => terms.start >= now && terms.start < terms.expiration,
        ExerciseStyle::Bermudan => {
            terms.start >= now
                && terms.start < terms.expiration
                && terms.periodicity > 2 * WINDOW_WIDTH
        }
    }
}

/// Whether exercise is allowed at `now`
pub fn is_open(terms: &ExerciseTerms, now: u64) -> bool {
    if now > terms.expiration {
        return false;
    }

    match terms.style {
        ExerciseStyle::American => true,
        ExerciseStyle::European => {
            let opens = terms
                .expiration
                .saturating_sub(WINDOW_WIDTH)
                .max(terms.start);
            now >= opens
        }
        ExerciseStyle::Bermudan => {
            let first_open = terms.start.saturating_sub(WINDOW_WIDTH);
            if now < first_open || terms.periodicity == 0 {
                return false;
            }
            // distance past the opening of the nearest window at or before now
            (now - first_open) % terms.periodicity <= 2 * WINDOW_WIDTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn terms(style: ExerciseStyle, start: u64, periodicity: u64, expiration: u64) -> ExerciseTerms {
        ExerciseTerms {
            style,
            expiration,
            start,
            periodicity,
        }
    }

    #[test]
    fn test_validate_rejects_past_expiration() {
        let t = terms(ExerciseStyle::American, 0, 0, NOW);
        assert!(!validate_terms(&t, NOW));
        let t = terms(ExerciseStyle::American, 0, 0, NOW + 1);
        assert!(validate_terms(&t, NOW));
    }

    #[test]
    fn test_validate_start_bounds() {
        let exp = NOW + 30 * DAY;
        assert!(!validate_terms(&terms(ExerciseStyle::European, exp, 0, exp), NOW));
        assert!(!validate_terms(&terms(ExerciseStyle::European, NOW - 1, 0, exp), NOW));
        assert!(validate_terms(&terms(ExerciseStyle::European, NOW, 0, exp), NOW));
        assert!(!validate_terms(&terms(ExerciseStyle::Bermudan, NOW + DAY, 2 * DAY, exp), NOW));
        assert!(validate_terms(&terms(ExerciseStyle::Bermudan, NOW + DAY, 7 * DAY, exp), NOW));
    }

    #[test]
    fn test_american_window() {
        let t = terms(ExerciseStyle::American, 0, 0, NOW + DAY);
        assert!(is_open(&t, NOW));
        assert!(is_open(&t, NOW + DAY));
        assert!(!is_open(&t, NOW + DAY + 1));
    }

    #[test]
    fn test_european_window() {
        let exp = NOW + 10 * DAY;
        let t = terms(ExerciseStyle::European, NOW, 0, exp);
        assert!(!is_open(&t, NOW));
        assert!(!is_open(&t, exp - DAY - 1));
        assert!(is_open(&t, exp - DAY));
        assert!(is_open(&t, exp));
        assert!(!is_open(&t, exp + 1));
    }

    #[test]
    fn test_bermudan_windows() {
        let start = NOW + 7 * DAY;
        let t = terms(ExerciseStyle::Bermudan, start, 7 * DAY, NOW + 60 * DAY);

        assert!(!is_open(&t, NOW));
        assert!(is_open(&t, start - DAY));
        assert!(is_open(&t, start));
        assert!(is_open(&t, start + DAY));
        assert!(!is_open(&t, start + DAY + 1));
        assert!(!is_open(&t, start + 3 * DAY));
        assert!(is_open(&t, start + 6 * DAY));
        assert!(is_open(&t, start + 14 * DAY));
        assert!(!is_open(&t, NOW + 60 * DAY + 1));
    }
}
