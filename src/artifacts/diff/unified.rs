//! Unified diff rendering
//!
//! Output follows the classic `---`/`+++` header, `@@ -a,b +c,d @@` hunk
//! layout. A range of length one prints only its start line; an empty range
//! prints the line before it with a length of zero.

use crate::artifacts::diff::myers::{Edit, EditKind, MyersDiff};
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Hunk<'d> {
    a_start: usize,
    b_start: usize,
    edits: Vec<Edit<'d, String>>,
}

impl Hunk<'_> {
    fn a_len(&self) -> usize {
        self.edits.iter().filter(|e| e.kind != EditKind::Insert).count()
    }

    fn b_len(&self) -> usize {
        self.edits.iter().filter(|e| e.kind != EditKind::Delete).count()
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{} +{} @@",
            format_range(self.a_start, self.a_len()),
            format_range(self.b_start, self.b_len())
        )
    }

    pub fn lines(&self) -> impl Iterator<Item = (EditKind, String)> + '_ {
        self.edits
            .iter()
            .map(|edit| (edit.kind, format!("{}{}", edit.kind.marker(), edit.value)))
    }
}

fn format_range(start: usize, len: usize) -> String {
    match len {
        1 => format!("{}", start + 1),
        0 => format!("{start},0"),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Group an edit script into hunks with `context` unchanged lines around each change
///
/// Two changes stay in the same hunk while the unchanged run between them is
/// at most twice the context.
pub fn hunks<'d>(edits: &[Edit<'d, String>], context: usize) -> Vec<Hunk<'d>> {
    let changes = edits
        .iter()
        .enumerate()
        .filter(|(_, edit)| edit.kind != EditKind::Equal)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let mut groups: Vec<(usize, usize)> = Vec::new();
    for change in changes {
        match groups.last_mut() {
            Some((_, last)) if change - *last - 1 <= 2 * context => *last = change,
            _ => groups.push((change, change)),
        }
    }

    groups
        .into_iter()
        .map(|(first, last)| {
            let start = first.saturating_sub(context);
            let end = (last + context + 1).min(edits.len());
            let slice = edits[start..end].to_vec();

            Hunk::new(slice[0].a_pos, slice[0].b_pos, slice)
        })
        .collect()
}

/// Render the unified diff of two line sequences; identical inputs render nothing
pub fn unified_diff(
    a: &[String],
    b: &[String],
    a_label: &str,
    b_label: &str,
    context: usize,
) -> Vec<(EditKind, String)> {
    let edits = MyersDiff::new(a, b).diff();
    let hunks = hunks(&edits, context);
    if hunks.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![
        (EditKind::Delete, format!("--- {a_label}")),
        (EditKind::Insert, format!("+++ {b_label}")),
    ];
    for hunk in &hunks {
        lines.push((EditKind::Equal, hunk.header()));
        lines.extend(hunk.lines());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::diff::CONTEXT_LINES;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn render(a: &str, b: &str) -> Vec<String> {
        unified_diff(&lines(a), &lines(b), "f (index)", "f (working copy)", CONTEXT_LINES)
            .into_iter()
            .map(|(_, line)| line)
            .collect()
    }

    #[rstest]
    #[case(0, 0, "0,0")]
    #[case(4, 0, "4,0")]
    #[case(0, 1, "1")]
    #[case(9, 1, "10")]
    #[case(0, 3, "1,3")]
    fn ranges_use_compact_forms(#[case] start: usize, #[case] len: usize, #[case] expected: &str) {
        assert_eq!(format_range(start, len), expected);
    }

    #[test]
    fn identical_inputs_render_nothing() {
        assert!(render("a\nb\n", "a\nb\n").is_empty());
    }

    #[test]
    fn single_change_has_three_lines_of_context() {
        let a = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let b = "1\n2\n3\n4\nfive\n6\n7\n8\n9\n";

        assert_eq!(
            render(a, b),
            vec![
                "--- f (index)",
                "+++ f (working copy)",
                "@@ -2,7 +2,7 @@",
                " 2",
                " 3",
                " 4",
                "-5",
                "+five",
                " 6",
                " 7",
                " 8",
            ]
        );
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let a = (1..=20).map(|i| format!("{i}\n")).collect::<String>();
        let b = (1..=20)
            .map(|i| match i {
                2 => "two\n".to_string(),
                19 => "nineteen\n".to_string(),
                _ => format!("{i}\n"),
            })
            .collect::<String>();

        let rendered = render(&a, &b);
        let headers = rendered
            .iter()
            .filter(|line| line.starts_with("@@"))
            .collect::<Vec<_>>();

        assert_eq!(headers, vec!["@@ -1,5 +1,5 @@", "@@ -16,5 +16,5 @@"]);
    }

    #[test]
    fn insertion_into_empty_file() {
        assert_eq!(
            render("", "hello\n"),
            vec!["--- f (index)", "+++ f (working copy)", "@@ -0,0 +1 @@", "+hello"]
        );
    }

    #[test]
    fn deleting_everything() {
        assert_eq!(
            render("a\nb\n", ""),
            vec!["--- f (index)", "+++ f (working copy)", "@@ -1,2 +0,0 @@", "-a", "-b"]
        );
    }
}
