//! Pure indicator computations: header tri-state, summary text, trigger state.

use super::state::SelectionState;

/// Visual state of a tri-state checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderState {
    /// Header checkbox state from the rows on this page only.
    ///
    /// Never consults the total count.
    pub fn compute(state: &SelectionState, visible: usize, visible_selected: usize) -> Self {
        if state.is_all_matching() {
            Self::Checked
        } else if state.selected.is_empty() || visible_selected == 0 {
            Self::Unchecked
        } else if visible_selected < visible {
            Self::Indeterminate
        } else {
            Self::Checked
        }
    }

    /// (checked, indeterminate) as written to the checkbox.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::Unchecked => (false, false),
            Self::Indeterminate => (false, true),
            Self::Checked => (true, false),
        }
    }
}

/// Total number of items matching the query, from the table's data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCount {
    /// Absent, unparseable or zero.
    Unknown,
    Known(u64),
}

impl TotalCount {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(|s| s.trim().parse::<u64>().ok()) {
            Some(n) if n > 0 => Self::Known(n),
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// "`sel` of `cnt` selected", or "`sel` selected" without a known total.
pub fn summary_text(state: &SelectionState, total: TotalCount) -> String {
    match total {
        TotalCount::Known(count) => {
            let selected = if state.is_all_matching() {
                count
            } else {
                state.selected.len() as u64
            };
            format!("{} of {} selected", selected, count)
        }
        TotalCount::Unknown => format!("{} selected", state.selected.len()),
    }
}

/// Whether the select-all-matching trigger shows as selected.
///
/// Without a known total there is no difference between "this page" and
/// "everything". A page with no rows has nothing to select, so the trigger
/// stays unselected there.
pub fn trigger_selected(state: &SelectionState, total: TotalCount, visible: usize) -> bool {
    if state.is_all_matching() {
        return true;
    }
    !total.is_known() && visible > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_state_tri_state() {
        let empty = SelectionState::new();
        assert_eq!(HeaderState::compute(&empty, 10, 0), HeaderState::Unchecked);

        let some = SelectionState::partial(["1", "2"]);
        assert_eq!(HeaderState::compute(&some, 10, 2), HeaderState::Indeterminate);
        assert_eq!(HeaderState::compute(&some, 2, 2), HeaderState::Checked);
        // Selected rows live on another page
        assert_eq!(HeaderState::compute(&some, 10, 0), HeaderState::Unchecked);
    }

    #[test]
    fn test_header_state_all_matching_without_rows() {
        let all = SelectionState::all_matching();
        assert_eq!(HeaderState::compute(&all, 0, 0), HeaderState::Checked);
        assert_eq!(HeaderState::Checked.flags(), (true, false));
        assert_eq!(HeaderState::Indeterminate.flags(), (false, true));
    }

    #[test]
    fn test_total_count_parse() {
        assert_eq!(TotalCount::parse(Some("437")), TotalCount::Known(437));
        assert_eq!(TotalCount::parse(Some(" 12 ")), TotalCount::Known(12));
        assert_eq!(TotalCount::parse(Some("0")), TotalCount::Unknown);
        assert_eq!(TotalCount::parse(Some("")), TotalCount::Unknown);
        assert_eq!(TotalCount::parse(Some("many")), TotalCount::Unknown);
        assert_eq!(TotalCount::parse(None), TotalCount::Unknown);
    }

    #[test]
    fn test_summary_text() {
        let state = SelectionState::partial(["a", "b", "c"]);
        assert_eq!(summary_text(&state, TotalCount::Known(437)), "3 of 437 selected");
        assert_eq!(summary_text(&state, TotalCount::Unknown), "3 selected");

        let all = SelectionState::all_matching();
        assert_eq!(summary_text(&all, TotalCount::Known(437)), "437 of 437 selected");
        assert_eq!(summary_text(&all, TotalCount::Unknown), "0 selected");
    }

    #[test]
    fn test_trigger_selected() {
        let empty = SelectionState::new();
        assert!(trigger_selected(&empty, TotalCount::Unknown, 10));
        assert!(!trigger_selected(&empty, TotalCount::Known(437), 25));
        assert!(!trigger_selected(&empty, TotalCount::Unknown, 0));
        assert!(trigger_selected(
            &SelectionState::all_matching(),
            TotalCount::Known(437),
            25
        ));
    }
}
