//! 合成请求切块
//!
//! 外部合成 API 有单次请求字符上限；优先在句边界切分，
//! 单句超长时才按字符硬切（保证不破坏 UTF-8 边界）。

/// 句终结符后跟空白（或文本结尾）视为句边界
fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '。' | '！' | '？')
}

/// 把文本切成不超过 max_chars 个字符的块，优先在句边界断开
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        if current_len > 0 && current_len + sentence_len > max_chars {
            chunks.push(current.trim().to_string());
            current = String::new();
            current_len = 0;
        }
        if sentence_len > max_chars {
            // 单句超长：硬切
            for piece in hard_split(&sentence, max_chars) {
                chunks.push(piece);
            }
            continue;
        }
        current.push_str(&sentence);
        current_len += sentence_len;
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks
}

/// 按句切分，保留句终结符与其后的空白（拼回去无损）
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if is_sentence_terminator(c) {
            let at_boundary = chars.peek().map(|n| n.is_whitespace()).unwrap_or(true);
            if at_boundary {
                // 吸收边界空白，句子随空白一起归入当前块
                while let Some(n) = chars.peek() {
                    if n.is_whitespace() {
                        current.push(*n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                sentences.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = chunk_text("Hello there. How are you?", 100);
        assert_eq!(chunks, vec!["Hello there. How are you?"]);
    }

    #[test]
    fn splits_at_sentence_boundaries() {
        let chunks = chunk_text("First sentence. Second sentence. Third sentence.", 20);
        assert_eq!(
            chunks,
            vec!["First sentence.", "Second sentence.", "Third sentence."]
        );
    }

    #[test]
    fn packs_sentences_up_to_limit() {
        let chunks = chunk_text("One. Two. Three.", 12);
        // "One. Two." 装得下，"Three." 另起一块
        assert_eq!(chunks, vec!["One. Two.", "Three."]);
    }

    #[test]
    fn hard_splits_overlong_sentence() {
        let long = "a".repeat(25);
        let chunks = chunk_text(&long, 10);
        assert_eq!(chunks.len(), 3);
        for c in &chunks {
            assert!(c.chars().count() <= 10);
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn abbreviation_period_without_space_does_not_split() {
        // "3.5" 内的点不是句边界
        let chunks = chunk_text("Version 3.5 is out. Enjoy!", 100);
        assert_eq!(chunks, vec!["Version 3.5 is out. Enjoy!"]);
    }
}
