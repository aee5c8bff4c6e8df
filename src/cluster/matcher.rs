//! Incremental grapheme-cluster matcher
//!
//! Codepoints are fed one at a time. Each one either starts or extends
//! partial matches against the compiled patterns; when a partial match could
//! end at the current codepoint and the terminal has a combined width for
//! that exact sequence, the width reported for the codepoint is corrected so
//! the running total equals the combined width of the cluster.

use super::pattern::{Pattern, PatternSet};
use crate::table::{WidthTable, CODEPOINT_COUNT};
use crate::width::Advance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partial {
    pattern: usize,
    next_part: usize,
    consumed: usize,
    acc: u32,
    /// Cells already reported for the codepoints this match consumed
    emitted: i32,
}

impl Partial {
    fn fresh(pattern: usize) -> Self {
        Self {
            pattern,
            next_part: 0,
            consumed: 0,
            acc: 0,
            emitted: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Best {
    pattern: usize,
    consumed: usize,
    emitted: i32,
    combined: i32,
}

/// Per-stream matcher state
#[derive(Debug, Clone, Default)]
pub struct ClusterState {
    partials: Vec<Partial>,
    scratch: Vec<Partial>,
    uncertain: usize,
}

impl ClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every partial match
    pub fn reset(&mut self) {
        self.partials.clear();
        self.uncertain = 0;
    }

    /// Length of the longest partial match touched by the last codepoint
    ///
    /// Above 1, the last codepoint may belong to a cluster that is still
    /// growing, so the position after it is not a safe break.
    pub fn uncertain(&self) -> usize {
        self.uncertain
    }
}

/// Measures codepoints in the context of the clusters they belong to
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    patterns: &'a PatternSet,
    table: &'a WidthTable,
}

impl<'a> Matcher<'a> {
    pub fn new(patterns: &'a PatternSet, table: &'a WidthTable) -> Self {
        Self { patterns, table }
    }

    /// Cells to advance for `codepoint`, given the codepoints before it
    pub fn advance(&self, codepoint: u32, state: &mut ClusterState) -> Advance {
        let own = if codepoint < CODEPOINT_COUNT {
            self.table.lookup(codepoint).cells()
        } else {
            None
        };
        let Some(own) = own else {
            state.reset();
            return Advance::Control;
        };

        let candidates = self.patterns.candidates(codepoint);
        let ClusterState {
            partials,
            scratch,
            uncertain,
        } = state;
        scratch.clear();

        for partial in partials.drain(..) {
            if candidates.binary_search(&partial.pattern).is_ok() {
                scratch.extend(self.step(partial, codepoint));
            }
        }
        for &pattern in candidates {
            scratch.extend(self.step(Partial::fresh(pattern), codepoint));
        }

        let mut best: Option<Best> = None;
        for partial in scratch.iter() {
            let Some(pattern) = self.patterns.pattern(partial.pattern) else {
                continue;
            };
            if !pattern.terminable(partial.next_part) {
                continue;
            }
            let id = pattern.finish(partial.acc, partial.next_part);
            let Some(combined) = self.table.lookup(id).cells() else {
                continue;
            };
            let better = best.map_or(true, |b| {
                partial.consumed > b.consumed
                    || (partial.consumed == b.consumed && partial.pattern < b.pattern)
            });
            if better {
                best = Some(Best {
                    pattern: partial.pattern,
                    consumed: partial.consumed,
                    emitted: partial.emitted,
                    combined: i32::from(combined),
                });
            }
        }

        let cells = match best {
            Some(b) => b.combined - b.emitted,
            None => i32::from(own),
        };
        for partial in scratch.iter_mut() {
            partial.emitted += cells;
        }

        if let Some(b) = best {
            // The matched run is fixed; shorter matches inside it cannot
            // start a cluster of their own
            scratch.retain(|p| p.consumed >= b.consumed);
        }
        scratch.retain(|p| {
            self.patterns
                .pattern(p.pattern)
                .is_some_and(|pattern| p.next_part < pattern.parts().len())
        });
        *uncertain = scratch.iter().map(|p| p.consumed).max().unwrap_or(0);
        std::mem::swap(partials, scratch);

        Advance::Cells(cells)
    }

    /// Extend a partial match by one codepoint, skipping optional parts that
    /// do not match it
    fn step(&self, mut partial: Partial, codepoint: u32) -> Option<Partial> {
        let pattern: &Pattern = self.patterns.pattern(partial.pattern)?;
        while let Some(part) = pattern.parts().get(partial.next_part) {
            partial.acc *= part.radix();
            partial.next_part += 1;
            if let Some(digit) = part.digit(codepoint) {
                partial.acc += digit;
                partial.consumed += 1;
                return Some(partial);
            }
            if !part.is_optional() {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{encode, Breakpoint};
    use crate::width::Width;

    struct Fixture {
        patterns: PatternSet,
        table: WidthTable,
    }

    impl Fixture {
        /// Base widths: everything narrow except the given wide codepoints
        /// and the zero-width joiner, with the listed sequences supported
        fn new(patterns: &str, wide: &[u32], supported: &[(usize, Vec<usize>)]) -> Self {
            let patterns = PatternSet::compile(patterns).unwrap();
            let mut marks: Vec<(u32, Width)> = vec![
                (0, Width::Narrow),
                (0x9, Width::Unmeasurable),
                (0xa, Width::Narrow),
            ];
            for &cp in wide {
                marks.push((cp, Width::Wide));
                if !wide.contains(&(cp + 1)) {
                    marks.push((cp + 1, Width::Narrow));
                }
            }
            marks.push((0x200D, Width::Zero));
            marks.push((0x200E, Width::Narrow));
            marks.push((CODEPOINT_COUNT, Width::Unsupported));
            for (pattern, digits) in supported {
                let id = patterns.encode(*pattern, digits).unwrap();
                marks.push((id, Width::Wide));
                marks.push((id + 1, Width::Unsupported));
            }
            marks.sort_by_key(|(cp, _)| *cp);
            let mut breakpoints: Vec<Breakpoint> = Vec::new();
            for (cp, width) in marks {
                match breakpoints.last_mut() {
                    Some(last) if last.start == cp => last.width = width,
                    _ => breakpoints.push(Breakpoint::new(cp, width)),
                }
            }
            let table = WidthTable::from_stack(&[&encode(&breakpoints)]).unwrap();
            Self { patterns, table }
        }

        fn run(&self, codepoints: &[u32]) -> Vec<Advance> {
            let matcher = Matcher::new(&self.patterns, &self.table);
            let mut state = ClusterState::new();
            codepoints.iter().map(|&cp| matcher.advance(cp, &mut state)).collect()
        }
    }

    const MAN: u32 = 0x1F468;
    const WOMAN: u32 = 0x1F469;
    const GIRL: u32 = 0x1F467;
    const ZWJ: u32 = 0x200D;
    const TONE: u32 = 0x1F3FD;

    fn emoji() -> Vec<u32> {
        vec![MAN, WOMAN, GIRL, TONE]
    }

    #[test]
    fn test_no_patterns_reports_own_width() {
        let f = Fixture::new("&*?", &emoji(), &[]);
        assert_eq!(
            f.run(&['a' as u32, MAN, 0x9]),
            vec![Advance::Cells(1), Advance::Cells(2), Advance::Control]
        );
    }

    #[test]
    fn test_modifier_merges_into_base() {
        // man + medium skin tone
        let f = Fixture::new("&*?", &emoji(), &[(0, vec![0, 0]), (0, vec![0, 3])]);
        assert_eq!(f.run(&[MAN, TONE]), vec![Advance::Cells(2), Advance::Cells(0)]);
    }

    #[test]
    fn test_unsupported_combination_sums_parts() {
        let f = Fixture::new("&*?", &emoji(), &[(0, vec![0, 0])]);
        assert_eq!(f.run(&[MAN, TONE]), vec![Advance::Cells(2), Advance::Cells(2)]);
    }

    #[test]
    fn test_family_corrects_retroactively() {
        let patterns = "&+&+~ &+~";
        let f = Fixture::new(patterns, &emoji(), &[(0, vec![0, 0, 1, 0, 1]), (1, vec![1, 0, 1])]);
        let advances = f.run(&[MAN, ZWJ, WOMAN, ZWJ, GIRL]);
        assert_eq!(
            advances,
            vec![
                Advance::Cells(2),
                Advance::Cells(0),
                Advance::Cells(2),
                Advance::Cells(0),
                Advance::Cells(-2),
            ]
        );
        let total: i32 = advances.iter().map(|a| a.delta()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_longest_match_wins() {
        // woman+girl is also supported, but the whole family is longer
        let f = Fixture::new("&+&+~ &+~", &emoji(), &[(0, vec![0, 0, 1, 0, 1]), (1, vec![1, 0, 1])]);
        let total: i32 = f.run(&[MAN, ZWJ, WOMAN, ZWJ, GIRL]).iter().map(|a| a.delta()).sum();
        assert_eq!(total, 2);

        let total: i32 = f.run(&[WOMAN, ZWJ, GIRL]).iter().map(|a| a.delta()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_regional_indicators_pair_up() {
        let us = [0x1F1FA, 0x1F1F8];
        let f = Fixture::new("$$", &[], &[(0, vec![20, 18]), (0, vec![18, 20])]);
        // U S U S: two flags
        let advances = f.run(&[us[0], us[1], us[0], us[1]]);
        assert_eq!(
            advances,
            vec![
                Advance::Cells(1),
                Advance::Cells(1),
                Advance::Cells(1),
                Advance::Cells(1),
            ]
        );
        // S U S: only "SU" is a flag, the trailing S stands alone
        let total: i32 = f.run(&[us[1], us[0], us[1]]).iter().map(|a| a.delta()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_control_resets_state() {
        let f = Fixture::new("&*?", &emoji(), &[(0, vec![0, 0]), (0, vec![0, 3])]);
        let matcher = Matcher::new(&f.patterns, &f.table);
        let mut state = ClusterState::new();
        assert_eq!(matcher.advance(MAN, &mut state), Advance::Cells(2));
        assert_eq!(state.uncertain(), 1);
        assert_eq!(matcher.advance(0x9, &mut state), Advance::Control);
        assert_eq!(state.uncertain(), 0);
        assert_eq!(matcher.advance(TONE, &mut state), Advance::Cells(2));
    }

    #[test]
    fn test_uncertain_tracks_growing_match() {
        let f = Fixture::new("&+&+~", &emoji(), &[(0, vec![0, 0, 1, 0, 1])]);
        let matcher = Matcher::new(&f.patterns, &f.table);
        let mut state = ClusterState::new();
        let mut seen = Vec::new();
        for cp in [MAN, ZWJ, WOMAN, ZWJ, GIRL, 'x' as u32] {
            matcher.advance(cp, &mut state);
            seen.push(state.uncertain());
        }
        // The finished family cannot grow any further
        assert_eq!(seen, vec![1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_synthetic_ids_are_not_text() {
        let f = Fixture::new("&*?", &emoji(), &[(0, vec![0, 0])]);
        assert_eq!(f.run(&[CODEPOINT_COUNT]), vec![Advance::Control]);
    }
}
