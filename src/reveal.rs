//! Section reveal progression.
//!
//! A reader starts at some position `p`. Every human-written section
//! (`variant == 0`) with `position <= p` is visible; every section at
//! `p + 1` is a candidate for the next step. Picking the human-written
//! candidate advances the cursor, picking a distractor only counts a
//! mistake.
//!
//! Candidates are ordered by `section_text`, ties broken by
//! `article_section_id`, so the same data always renders the same choices.

use im::OrdSet;

use crate::api::ArticleSection;

/// Human-written sections revealed at `position`, ascending by position.
pub fn compute_visible(sections: &[ArticleSection], position: i64) -> Vec<&ArticleSection> {
    let mut visible = sections
        .iter()
        .filter(|s| s.is_correct() && s.position <= position)
        .collect::<Vec<_>>();
    visible.sort_by_key(|s| (s.position, s.article_section_id));
    visible
}

/// Every section offered as the continuation after `position`.
pub fn compute_candidates(sections: &[ArticleSection], position: i64) -> Vec<&ArticleSection> {
    let Some(next) = position.checked_add(1) else {
        return Vec::new();
    };
    let mut candidates = sections
        .iter()
        .filter(|s| s.position == next)
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| {
        a.section_text
            .cmp(&b.section_text)
            .then(a.article_section_id.cmp(&b.article_section_id))
    });
    candidates
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<'a> {
    /// Candidates exist and one of them is the correct continuation.
    Open(Vec<&'a ArticleSection>),
    /// Candidates exist but none is correct; the reader cannot advance.
    Stalled(Vec<&'a ArticleSection>),
    /// Nothing follows the current position.
    Finished,
}

pub fn progress(sections: &[ArticleSection], position: i64) -> Progress<'_> {
    let candidates = compute_candidates(sections, position);
    if candidates.is_empty() {
        Progress::Finished
    } else if candidates.iter().any(|s| s.is_correct()) {
        Progress::Open(candidates)
    } else {
        Progress::Stalled(candidates)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevealError {
    #[error("no sections follow position {position}")]
    Finished { position: i64 },
    #[error("candidate {index} does not exist ({available} available)")]
    NoSuchCandidate { index: usize, available: usize },
}

/// Reader progress through one article. Transitions return a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    position: i64,
    mistakes: u32,
    marks: OrdSet<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub state: RevealState,
    pub outcome: Outcome,
}

impl RevealState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state, e.g. from URL query parameters. Negative positions
    /// clamp to 0.
    pub fn restore(position: i64, mistakes: u32, marks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            position: position.max(0),
            mistakes,
            marks: marks.into_iter().collect(),
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Whether the reader already committed to candidate `index` at the
    /// current position.
    pub fn is_marked(&self, index: usize) -> bool {
        self.marks.contains(&index)
    }

    pub fn marks(&self) -> impl Iterator<Item = usize> + '_ {
        self.marks.iter().copied()
    }

    pub fn visible<'a>(&self, sections: &'a [ArticleSection]) -> Vec<&'a ArticleSection> {
        compute_visible(sections, self.position)
    }

    pub fn candidates<'a>(&self, sections: &'a [ArticleSection]) -> Vec<&'a ArticleSection> {
        compute_candidates(sections, self.position)
    }

    pub fn progress<'a>(&self, sections: &'a [ArticleSection]) -> Progress<'a> {
        progress(sections, self.position)
    }

    pub fn select(
        &self,
        sections: &[ArticleSection],
        index: usize,
    ) -> Result<Selection, RevealError> {
        let candidates = self.candidates(sections);
        if candidates.is_empty() {
            return Err(RevealError::Finished {
                position: self.position,
            });
        }
        let Some(candidate) = candidates.get(index) else {
            return Err(RevealError::NoSuchCandidate {
                index,
                available: candidates.len(),
            });
        };

        if candidate.is_correct() {
            let position = self
                .position
                .checked_add(1)
                .ok_or(RevealError::Finished {
                    position: self.position,
                })?;
            Ok(Selection {
                state: Self {
                    position,
                    mistakes: self.mistakes,
                    marks: OrdSet::new(),
                },
                outcome: Outcome::Correct,
            })
        } else {
            Ok(Selection {
                state: Self {
                    position: self.position,
                    mistakes: self.mistakes.saturating_add(1),
                    marks: self.marks.update(index),
                },
                outcome: Outcome::Wrong,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::api::Article;

    pub(crate) fn section(id: i64, position: i64, variant: i64, text: &str) -> ArticleSection {
        ArticleSection {
            article_section_id: id,
            creation_time: 0,
            creator_user_id: 1,
            article: Article {
                article_id: 1,
                creation_time: 0,
                creator_user_id: 1,
            },
            position,
            variant,
            section_text: text.to_owned(),
            active: true,
        }
    }

    fn texts(sections: &[&ArticleSection]) -> Vec<String> {
        sections.iter().map(|s| s.section_text.clone()).collect()
    }

    fn scenario() -> Vec<ArticleSection> {
        vec![
            section(1, 0, 0, "A"),
            section(3, 1, 1, "B-wrong"),
            section(2, 1, 0, "B-correct"),
        ]
    }

    #[test]
    fn walk_through_with_one_mistake() {
        let sections = scenario();
        let state = RevealState::new();

        assert_eq!(texts(&state.visible(&sections)), ["A"]);
        assert_eq!(
            texts(&state.candidates(&sections)),
            ["B-correct", "B-wrong"]
        );

        let wrong = state.select(&sections, 1).unwrap();
        assert_eq!(wrong.outcome, Outcome::Wrong);
        assert_eq!(wrong.state.mistakes(), 1);
        assert_eq!(wrong.state.position(), 0);
        assert!(wrong.state.is_marked(1));
        assert!(!wrong.state.is_marked(0));
        assert_eq!(texts(&wrong.state.visible(&sections)), ["A"]);

        let right = wrong.state.select(&sections, 0).unwrap();
        assert_eq!(right.outcome, Outcome::Correct);
        assert_eq!(right.state.position(), 1);
        assert_eq!(right.state.mistakes(), 1);
        assert!(!right.state.is_marked(1));
        assert_eq!(texts(&right.state.visible(&sections)), ["A", "B-correct"]);
        assert!(right.state.candidates(&sections).is_empty());
        assert_eq!(right.state.progress(&sections), Progress::Finished);
    }

    #[test]
    fn select_leaves_original_state_untouched() {
        let sections = scenario();
        let state = RevealState::new();
        let _ = state.select(&sections, 1).unwrap();
        assert_eq!(state, RevealState::new());
    }

    #[test]
    fn select_after_the_end_is_an_error() {
        let sections = scenario();
        let state = RevealState::restore(1, 0, []);
        assert_eq!(
            state.select(&sections, 0),
            Err(RevealError::Finished { position: 1 })
        );
    }

    #[test]
    fn select_out_of_range_is_an_error() {
        let sections = scenario();
        assert_eq!(
            RevealState::new().select(&sections, 5),
            Err(RevealError::NoSuchCandidate {
                index: 5,
                available: 2
            })
        );
    }

    #[test]
    fn only_distractors_is_stalled() {
        let sections = vec![section(1, 0, 0, "A"), section(2, 1, 2, "decoy")];
        let state = RevealState::new();
        assert!(matches!(state.progress(&sections), Progress::Stalled(c) if c.len() == 1));

        let next = state.select(&sections, 0).unwrap();
        assert_eq!(next.outcome, Outcome::Wrong);
        assert_eq!(next.state.position(), 0);
    }

    #[test]
    fn nothing_follows_the_last_position() {
        let sections = vec![section(1, i64::MAX, 0, "last")];
        assert!(compute_candidates(&sections, i64::MAX).is_empty());

        let state = RevealState::restore(i64::MAX, 0, []);
        assert_eq!(state.progress(&sections), Progress::Finished);
        assert_eq!(
            state.select(&sections, 0),
            Err(RevealError::Finished { position: i64::MAX })
        );
        assert_eq!(texts(&state.visible(&sections)), ["last"]);
    }

    #[test]
    fn equal_texts_are_ordered_by_id() {
        let sections = vec![
            section(9, 1, 1, "same"),
            section(4, 1, 0, "same"),
            section(7, 1, 2, "alpha"),
        ];
        let ids = compute_candidates(&sections, 0)
            .iter()
            .map(|s| s.article_section_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, [7, 4, 9]);
    }

    #[test]
    fn restore_clamps_negative_position() {
        assert_eq!(RevealState::restore(-4, 2, [1]).position(), 0);
    }

    fn arb_sections() -> impl Strategy<Value = Vec<ArticleSection>> {
        prop::collection::vec((0i64..6, 0i64..3, "[a-d]{1,3}"), 0..24).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (position, variant, text))| section(i as i64, position, variant, &text))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn visible_is_correct_revealed_and_ordered(sections in arb_sections(), p in 0i64..7) {
            let visible = compute_visible(&sections, p);
            prop_assert!(visible.iter().all(|s| s.variant == 0 && s.position <= p));
            prop_assert!(visible.windows(2).all(|w| w[0].position <= w[1].position));
            let expected = sections.iter().filter(|s| s.variant == 0 && s.position <= p).count();
            prop_assert_eq!(visible.len(), expected);
        }

        #[test]
        fn candidates_are_exactly_the_next_position(sections in arb_sections(), p in 0i64..7) {
            let candidates = compute_candidates(&sections, p);
            prop_assert!(candidates.iter().all(|s| s.position == p + 1));
            let expected = sections.iter().filter(|s| s.position == p + 1).count();
            prop_assert_eq!(candidates.len(), expected);
            prop_assert_eq!(candidates.is_empty(), progress(&sections, p) == Progress::Finished);
        }

        #[test]
        fn computations_are_pure(sections in arb_sections(), p in 0i64..7) {
            prop_assert_eq!(compute_visible(&sections, p), compute_visible(&sections, p));
            prop_assert_eq!(compute_candidates(&sections, p), compute_candidates(&sections, p));
        }

        #[test]
        fn select_moves_exactly_one_counter(
            sections in arb_sections(),
            p in 0i64..7,
            mistakes in 0u32..5,
            index in 0usize..8,
        ) {
            let state = RevealState::restore(p, mistakes, []);
            let candidates = state.candidates(&sections);
            match state.select(&sections, index) {
                Ok(selection) => {
                    let picked = candidates[index];
                    if picked.variant == 0 {
                        prop_assert_eq!(selection.outcome, Outcome::Correct);
                        prop_assert_eq!(selection.state.position(), p + 1);
                        prop_assert_eq!(selection.state.mistakes(), mistakes);
                    } else {
                        prop_assert_eq!(selection.outcome, Outcome::Wrong);
                        prop_assert_eq!(selection.state.position(), p);
                        prop_assert_eq!(selection.state.mistakes(), mistakes + 1);
                    }
                }
                Err(RevealError::Finished { .. }) => prop_assert!(candidates.is_empty()),
                Err(RevealError::NoSuchCandidate { available, .. }) => {
                    prop_assert!(index >= available);
                }
            }
        }
    }
}
