use std::collections::HashMap;

/// Official names of the top-level administrative regions, stripped wherever
/// they appear before scoring.
///
/// Ordered so that no entry contains an earlier one.
pub const REGION_NAMES: &[&str] = &[
    "서울특별시",
    "부산광역시",
    "대구광역시",
    "인천광역시",
    "광주광역시",
    "대전광역시",
    "울산광역시",
    "세종특별자치시",
    "경기도",
    "강원특별자치도",
    "강원도",
    "충청북도",
    "충청남도",
    "전북특별자치도",
    "전라북도",
    "전라남도",
    "경상북도",
    "경상남도",
    "제주특별자치도",
    "제주도",
];

/// Short region forms used by the geocoder's road addresses. These also occur
/// inside district and road names (부산진구, 세종대로), so they are only
/// dropped when they form the leading token.
pub const SHORT_REGION_NAMES: &[&str] = &[
    "서울",
    "부산",
    "대구",
    "인천",
    "광주",
    "대전",
    "울산",
    "세종",
    "경기",
    "강원",
    "충북",
    "충남",
    "전북",
    "전남",
    "경북",
    "경남",
    "제주",
];

/// Remove whitespace, a leading short region token and every official
/// region name.
pub fn normalize(address: &str) -> String {
    let mut tokens = address.split_whitespace().peekable();
    if tokens.peek().is_some_and(|token| SHORT_REGION_NAMES.contains(token)) {
        tokens.next();
    }

    let mut cleaned: String = tokens.collect();
    for region in REGION_NAMES {
        if cleaned.contains(region) {
            cleaned = cleaned.replace(region, "");
        }
    }
    cleaned
}

/// Similarity of two addresses as an integer percentage (0-100), using a
/// Ratcliff/Obershelp ratio over the normalized strings.
///
/// Returns 0 when either side is empty after cleaning, including the case
/// where both are empty.
pub fn score(a: &str, b: &str) -> u8 {
    let (a, b) = (normalize(a), normalize(b));
    // Canonical order keeps tie-breaking in the block search independent of
    // argument order.
    let (first, second) = if a <= b { (a, b) } else { (b, a) };

    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();
    if first.is_empty() || second.is_empty() {
        return 0;
    }

    let matched = matching_characters(&first, &second);
    ((200 * matched) / (first.len() + second.len())) as u8
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block in `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties resolve to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run length of the match ending at b[j], for the previous row of `a`
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_at = next_run;
    }

    (best_i, best_j, best_size)
}
