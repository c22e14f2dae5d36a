use crate::dendrogram::Dendrogram;
use crate::merge::non_negative;
use crate::UpgmaError;
use num_traits::Float;

enum Step {
    Open(usize),
    Between(usize),
    Close(usize),
}

/// Renders `tree` as `(left:length,right:length)` from the root down, followed by `;`. A leaf
/// renders as its name. Uses an explicit stack, so the depth of the tree is not limited by the
/// thread's stack size.
pub(crate) fn write_newick<T: Float>(tree: &Dendrogram<T>, precision: usize) -> String {
    let nodes = tree.nodes();
    let mut out = String::new();
    let mut stack = vec![Step::Open(tree.root())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let node = &nodes[id];
                match (node.left, node.right) {
                    (Some(left), Some(right)) => {
                        out.push('(');
                        stack.push(Step::Close(id));
                        stack.push(Step::Open(right));
                        stack.push(Step::Between(id));
                        stack.push(Step::Open(left));
                    }
                    _ => out.push_str(&node.name),
                }
            }
            Step::Between(id) => {
                out.push(':');
                out.push_str(&format_branch_length(nodes[id].branch_length_left, precision));
                out.push(',');
            }
            Step::Close(id) => {
                out.push(':');
                out.push_str(&format_branch_length(nodes[id].branch_length_right, precision));
                out.push(')');
            }
        }
    }
    out.push(';');
    out
}

/// Up to `precision` decimals with trailing zeros trimmed, so `1.000000` prints as `1`.
pub(crate) fn format_branch_length<T: Float>(length: T, precision: usize) -> String {
    let length = non_negative(length).to_f64().unwrap_or(0.0);
    let text = format!("{length:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Reads the leaf labels of a Newick string, left to right. Internal node labels and branch
/// lengths are skipped.
///
/// # Returns
/// * The leaf names, or `UpgmaError::MalformedNewick` if the string does not end in exactly one
///   `;`, has unbalanced parentheses, or has an empty leaf label.
///
/// # Examples
/// ```
///use upgma::parse_leaf_names;
///
///let names = parse_leaf_names("(D:3,(C:2,(A:1,B:1):1):1);").unwrap();
///assert_eq!(vec!["D", "C", "A", "B"], names);
/// ```
pub fn parse_leaf_names(newick: &str) -> Result<Vec<String>, UpgmaError> {
    let body = newick
        .trim()
        .strip_suffix(';')
        .ok_or_else(|| malformed("missing the terminating ';'"))?;
    if body.contains(';') {
        return Err(malformed("more than one ';'"));
    }

    let mut names = Vec::new();
    let mut label = String::new();
    let mut depth = 0usize;
    // False right after a ')', where a label names an internal node
    let mut at_leaf = true;
    let mut in_length = false;
    for ch in body.chars() {
        match ch {
            '(' => {
                if !at_leaf || in_length || !label.trim().is_empty() {
                    return Err(malformed("unexpected '('"));
                }
                depth += 1;
            }
            ',' | ')' => {
                take_label(&mut names, &mut label, at_leaf)?;
                in_length = false;
                if ch == ')' {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| malformed("unbalanced ')'"))?;
                    at_leaf = false;
                } else if depth == 0 {
                    return Err(malformed("',' outside of any parentheses"));
                } else {
                    at_leaf = true;
                }
            }
            ':' => in_length = true,
            _ if in_length => {}
            _ => label.push(ch),
        }
    }
    take_label(&mut names, &mut label, at_leaf)?;
    if depth != 0 {
        return Err(malformed("unbalanced '('"));
    }
    Ok(names)
}

fn take_label(
    names: &mut Vec<String>,
    label: &mut String,
    at_leaf: bool,
) -> Result<(), UpgmaError> {
    let name = label.trim();
    if at_leaf {
        if name.is_empty() {
            return Err(malformed("empty leaf label"));
        }
        names.push(name.to_string());
    }
    label.clear();
    Ok(())
}

fn malformed(msg: &str) -> UpgmaError {
    UpgmaError::MalformedNewick(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_wrappers::{ClusterNode, MergeCandidate};

    fn join(nodes: &mut Vec<ClusterNode<f64>>, left: usize, right: usize, height: f64) {
        let (l, r) = (&nodes[left], &nodes[right]);
        let node = ClusterNode {
            name: String::new(),
            left: Some(left),
            right: Some(right),
            height,
            branch_length_left: height - l.height,
            branch_length_right: height - r.height,
            size: l.size + r.size,
        };
        nodes.push(node);
    }

    #[test]
    fn branch_lengths_trim_trailing_zeros() {
        assert_eq!("1", format_branch_length(1.0, 6));
        assert_eq!("0.25", format_branch_length(0.25, 6));
        assert_eq!("0.333333", format_branch_length(1.0 / 3.0, 6));
        assert_eq!("0.33", format_branch_length(1.0 / 3.0, 2));
        assert_eq!("0", format_branch_length(-1e-12, 6));
        assert_eq!("0", format_branch_length(0.0, 6));
        assert_eq!("0", format_branch_length(-0.0, 6));
        assert_eq!("12", format_branch_length(12.0, 0));
    }

    #[test]
    fn renders_nested_tree() {
        let mut nodes: Vec<ClusterNode<f64>> =
            ["A", "B", "C", "D"].iter().map(|n| ClusterNode::leaf(n)).collect();
        join(&mut nodes, 0, 1, 1.0);
        join(&mut nodes, 2, 4, 2.0);
        join(&mut nodes, 3, 5, 3.0);
        let merges = vec![
            MergeCandidate::new(2.0, 0, 1),
            MergeCandidate::new(4.0, 2, 4),
            MergeCandidate::new(6.0, 3, 5),
        ];
        let tree = Dendrogram::new(nodes, merges, 6);
        assert_eq!("(D:3,(C:2,(A:1,B:1):1):1);", write_newick(&tree, 6));
    }

    #[test]
    fn single_leaf_renders_its_name() {
        let tree = Dendrogram::new(vec![ClusterNode::<f64>::leaf("Solo")], vec![], 0);
        assert_eq!("Solo;", write_newick(&tree, 6));
    }

    #[test]
    fn deep_caterpillar_does_not_recurse() {
        let n = 200_000;
        let mut nodes: Vec<ClusterNode<f64>> =
            (0..n).map(|i| ClusterNode::leaf(&format!("t{i}"))).collect();
        let mut merges = Vec::new();
        let mut last = 0;
        for i in 1..n {
            join(&mut nodes, last, i, i as f64);
            merges.push(MergeCandidate::new(2.0 * i as f64, last, i));
            last = nodes.len() - 1;
        }
        let tree = Dendrogram::new(nodes, merges, last);
        let newick = write_newick(&tree, 6);
        assert!(newick.starts_with(&"(".repeat(n - 1)));
        assert_eq!(n, parse_leaf_names(&newick).unwrap().len());
    }

    #[test]
    fn parses_leaf_names_and_skips_internal_labels() {
        let names = parse_leaf_names(" ((A:0.1,B:0.2)ab:0.3, C:1)root;\n").unwrap();
        assert_eq!(vec!["A", "B", "C"], names);
        assert_eq!(vec!["Solo"], parse_leaf_names("Solo;").unwrap());
    }

    #[test]
    fn rejects_malformed_strings() {
        for text in [
            "(A:1,B:1)",
            "(A:1,B:1);;",
            "((A:1,B:1);",
            "(A:1,B:1));",
            "(A:1,:1);",
            "A,B;",
            "(A(B,C));",
        ] {
            assert!(
                matches!(parse_leaf_names(text), Err(UpgmaError::MalformedNewick(_))),
                "{text}"
            );
        }
    }
}
