use crate::document::Section;
use crate::errors::CollyError;
use crate::trie::{Trie, TrieNode};
use std::path::Path;
use tiktoken_rs::get_bpe_from_model;
use tracing::{debug, info};

/// Logs per-file token counts for the rendered sections as a tree.
pub fn print_stats(sections: &[Section], model: &str) -> Result<(), CollyError> {
    debug!("Counting tokens with model {}", model);
    let tokenizer =
        get_bpe_from_model(model).map_err(|e| CollyError::TokenizerError(e.to_string()))?;

    let mut trie = Trie::new();
    let mut total_tokens = 0;
    for section in sections {
        let token_count = tokenizer.encode_ordinary(&section.text).len();
        trie.insert(Path::new(&section.display_path), token_count);
        total_tokens += token_count;
    }

    info!("Overall ({} tokens)", total_tokens);
    print_tree(trie.get_root(), "");
    Ok(())
}

fn print_tree(node: &TrieNode, prefix: &str) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "┗━━" } else { "┣━━" };

        match child.token_count {
            Some(tokens) if child.children.is_empty() => {
                info!("{}{} {} ({} tokens)", prefix, connector, name, tokens);
            }
            _ => {
                info!(
                    "{}{} {}/ ({} tokens)",
                    prefix,
                    connector,
                    name,
                    child.calculate_total_tokens()
                );
                let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "┃" });
                print_tree(child, &new_prefix);
            }
        }
    }
}
