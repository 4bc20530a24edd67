use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// A path component with an optional token count for the file it names.
#[derive(Debug, Default)]
pub struct TrieNode {
    pub children: BTreeMap<String, TrieNode>,
    pub token_count: Option<usize>,
}

impl TrieNode {
    /// Total tokens in this subtree.
    pub fn calculate_total_tokens(&self) -> usize {
        self.token_count.unwrap_or(0)
            + self
                .children
                .values()
                .map(TrieNode::calculate_total_tokens)
                .sum::<usize>()
    }
}

/// Path trie used to print token counts as a directory tree.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Trie::default()
    }

    pub fn insert(&mut self, path: &Path, token_count: usize) {
        let mut current_node = &mut self.root;
        for component in path.iter() {
            let component_str = component.to_string_lossy().into_owned();
            current_node = current_node.children.entry(component_str).or_default();
        }
        if current_node.token_count.is_some() {
            trace!("Overwriting existing token count for path: {:?}", path);
        }
        current_node.token_count = Some(token_count);
    }

    pub fn get_root(&self) -> &TrieNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_roll_up() {
        let mut trie = Trie::new();
        trie.insert(Path::new("src/a.rs"), 10);
        trie.insert(Path::new("src/b.rs"), 5);
        trie.insert(Path::new("README.md"), 2);

        let root = trie.get_root();
        assert_eq!(root.calculate_total_tokens(), 17);
        assert_eq!(root.children["src"].calculate_total_tokens(), 15);
        assert_eq!(root.children["README.md"].token_count, Some(2));
    }
}
