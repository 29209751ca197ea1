use derive_new::new;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Delete,
    Insert,
}

impl EditKind {
    pub fn marker(&self) -> char {
        match self {
            EditKind::Equal => ' ',
            EditKind::Delete => '-',
            EditKind::Insert => '+',
        }
    }
}

/// One step of an edit script
///
/// `a_pos` and `b_pos` are the positions in the old and new sequences before
/// this step is applied.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Edit<'d, T> {
    pub kind: EditKind,
    pub a_pos: usize,
    pub b_pos: usize,
    pub value: &'d T,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

/// Furthest-reaching x per diagonal as it stood before round `d`
///
/// Only diagonals `-(d + 1)..=d + 1` are kept since nothing else is read when
/// backtracking through the round, so the trace grows with the edit distance
/// rather than the input length.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    d: isize,
    v: Vec<isize>,
}

impl Snapshot {
    fn get(&self, k: isize) -> isize {
        self.v[(k + self.d + 1) as usize]
    }
}

impl<'d, T: Eq> MyersDiff<'d, T> {
    fn shortest_edit(&self) -> Vec<Snapshot> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let max = n + m;
        let offset = max + 1;
        let at = |k: isize| (offset + k) as usize;

        let mut v = vec![0isize; 2 * offset as usize + 1];
        let mut trace = Vec::new();

        for d in 0..=max {
            trace.push(Snapshot {
                d,
                v: v[at(-d - 1)..=at(d + 1)].to_vec(),
            });

            for k in (-d..=d).step_by(2) {
                let mut x = if k == -d || (k != d && v[at(k - 1)] < v[at(k + 1)]) {
                    // moved down from diagonal k+1
                    v[at(k + 1)]
                } else {
                    // moved right from diagonal k-1
                    v[at(k - 1)] + 1
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }

                v[at(k)] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    /// Walk the trace backwards, yielding `(prev_x, prev_y, x, y)` moves from the end
    fn backtrack(&self) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let mut moves = Vec::new();

        for snapshot in self.shortest_edit().iter().rev() {
            let d = snapshot.d;
            let k = x - y;

            let prev_k = if k == -d || (k != d && snapshot.get(k - 1) < snapshot.get(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = snapshot.get(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                moves.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                moves.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        moves
    }

    pub fn diff(&self) -> Vec<Edit<'d, T>> {
        let mut edits = self
            .backtrack()
            .into_iter()
            .map(|(prev_x, prev_y, x, y)| {
                let (a_pos, b_pos) = (prev_x as usize, prev_y as usize);
                if x == prev_x {
                    Edit::new(EditKind::Insert, a_pos, b_pos, &self.b[b_pos])
                } else if y == prev_y {
                    Edit::new(EditKind::Delete, a_pos, b_pos, &self.a[a_pos])
                } else {
                    Edit::new(EditKind::Equal, a_pos, b_pos, &self.a[a_pos])
                }
            })
            .collect::<Vec<_>>();

        edits.reverse();
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    fn script<T: Clone>(edits: &[Edit<'_, T>]) -> Vec<(EditKind, T)> {
        edits
            .iter()
            .map(|edit| (edit.kind, edit.value.clone()))
            .collect()
    }

    #[fixture]
    fn file_inputs() -> (Vec<&'static str>, Vec<&'static str>) {
        (
            vec!["line1", "line2", "line3", "line4"],
            vec!["line2", "line3_modified", "line4", "line5"],
        )
    }

    #[test]
    fn classic_example_is_minimal() {
        let a = "abcabba".chars().collect::<Vec<_>>();
        let b = "cbabac".chars().collect::<Vec<_>>();
        let edits = MyersDiff::new(&a, &b).diff();

        use EditKind::*;
        assert_eq!(
            script(&edits),
            vec![
                (Delete, 'a'),
                (Delete, 'b'),
                (Equal, 'c'),
                (Insert, 'b'),
                (Equal, 'a'),
                (Equal, 'b'),
                (Delete, 'b'),
                (Equal, 'a'),
                (Insert, 'c'),
            ]
        );
    }

    #[rstest]
    fn line_changes_are_tracked_with_positions(
        file_inputs: (Vec<&'static str>, Vec<&'static str>),
    ) {
        let (a, b) = file_inputs;
        let edits = MyersDiff::new(&a, &b).diff();

        assert_eq!(
            edits,
            vec![
                Edit::new(EditKind::Delete, 0, 0, &"line1"),
                Edit::new(EditKind::Equal, 1, 0, &"line2"),
                Edit::new(EditKind::Delete, 2, 1, &"line3"),
                Edit::new(EditKind::Insert, 3, 1, &"line3_modified"),
                Edit::new(EditKind::Equal, 3, 2, &"line4"),
                Edit::new(EditKind::Insert, 4, 3, &"line5"),
            ]
        );
    }

    #[rstest]
    #[case(vec![], vec![])]
    #[case(vec!["a"], vec![])]
    #[case(vec![], vec!["a", "b"])]
    fn empty_sides_are_handled(#[case] a: Vec<&str>, #[case] b: Vec<&str>) {
        let edits = MyersDiff::new(&a, &b).diff();
        assert_eq!(edits.len(), a.len() + b.len());
    }

    #[test]
    fn trace_grows_with_edit_distance_only() {
        let a = (0..5000).collect::<Vec<u32>>();
        let mut b = a.clone();
        b[2500] = u32::MAX;

        let diff = MyersDiff::new(&a, &b);
        let trace = diff.shortest_edit();

        assert_eq!(trace.len(), 3);
        assert_eq!(
            trace.iter().map(|snapshot| snapshot.v.len()).sum::<usize>(),
            3 + 5 + 7
        );
        assert_eq!(diff.diff().len(), 5001);
    }

    proptest! {
        #[test]
        fn edits_rebuild_both_sides(
            a in prop::collection::vec(0u8..4, 0..20),
            b in prop::collection::vec(0u8..4, 0..20),
        ) {
            let edits = MyersDiff::new(&a, &b).diff();

            let old = edits.iter().filter(|e| e.kind != EditKind::Insert).map(|e| *e.value).collect::<Vec<_>>();
            let new = edits.iter().filter(|e| e.kind != EditKind::Delete).map(|e| *e.value).collect::<Vec<_>>();
            prop_assert_eq!(old, a);
            prop_assert_eq!(new, b);
        }
    }
}
