/// Posting limit of the target platform, in weighted characters (see [`message_weight`])
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 280;

pub const ELLIPSIS: char = '…';

/// Every link counts as a shortened one, whatever its length
pub const LINK_WEIGHT: usize = 23;

const ADDRESS_HEAD: usize = 6;
const ADDRESS_TAIL: usize = 4;

/// `0x1234567890abcdef` -> `0x1234...cdef`. Anything shorter than ten characters
/// is returned as is.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < ADDRESS_HEAD + ADDRESS_TAIL {
        return address.to_string();
    }

    let head: String = chars[..ADDRESS_HEAD].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_TAIL..].iter().collect();
    format!("{head}...{tail}")
}

/// Length as the platform counts it. Links weigh [`LINK_WEIGHT`]. Characters
/// outside the Latin and general punctuation ranges weigh 2, so emojis do too.
/// Emoji sequences are counted per code point, which can only overestimate.
pub fn message_weight(text: &str) -> usize {
    split_links(text).into_iter().map(|(piece, is_link)| if is_link { LINK_WEIGHT } else { piece.chars().map(char_weight).sum() }).sum()
}

/// Cut `text` to a weight of at most `max_len`, marking the cut with an ellipsis.
/// Links are kept whole or dropped.
pub fn truncate_message(text: &str, max_len: usize) -> String {
    if message_weight(text) <= max_len {
        return text.to_string();
    }
    let ellipsis_weight = char_weight(ELLIPSIS);
    if max_len < ellipsis_weight {
        return String::new();
    }

    let budget = max_len - ellipsis_weight;
    let mut used = 0;
    let mut truncated = String::new();
    'pieces: for (piece, is_link) in split_links(text) {
        if is_link {
            if used + LINK_WEIGHT > budget {
                break;
            }
            used += LINK_WEIGHT;
            truncated.push_str(piece);
            continue;
        }
        for c in piece.chars() {
            let weight = char_weight(c);
            if used + weight > budget {
                break 'pieces;
            }
            used += weight;
            truncated.push(c);
        }
    }
    truncated.push(ELLIPSIS);
    truncated
}

fn char_weight(c: char) -> usize {
    match u32::from(c) {
        0..=0x10FF | 0x2000..=0x200D | 0x2010..=0x201F | 0x2032..=0x2037 => 1,
        _ => 2,
    }
}

/// Splits `text` into plain and link pieces. A link starts with `http://` or
/// `https://` after whitespace or at the start, and runs to the next whitespace.
fn split_links(text: &str) -> Vec<(&str, bool)> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some(start) = find_link(rest) else {
            pieces.push((rest, false));
            break;
        };
        let end = rest[start..].find(char::is_whitespace).map_or(rest.len(), |len| start + len);
        if start > 0 {
            pieces.push((&rest[..start], false));
        }
        pieces.push((&rest[start..end], true));
        rest = &rest[end..];
    }
    pieces
}

fn find_link(text: &str) -> Option<usize> {
    text.match_indices("http").map(|(idx, _)| idx).find(|&idx| {
        let tail = &text[idx..];
        (tail.starts_with("https://") || tail.starts_with("http://")) && text[..idx].chars().next_back().is_none_or(char::is_whitespace)
    })
}
