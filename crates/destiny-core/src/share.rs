use crate::fortune::FortuneOutcome;

/// Plain-text share message for a resolved fortune.
///
/// `origin` is the site root the invitation line points at; an empty origin
/// leaves the line bare.
pub fn share_text(outcome: &FortuneOutcome, origin: &str) -> String {
    let c = outcome.character;
    format!(
        "🔮 K-Destiny 운명 매칭 결과\n\
         \n\
         나의 운명의 캐릭터: {} ({})\n\
         {} {}\n\
         \n\
         💫 {}\n\
         \n\
         🍀 럭키 아이템: {}\n\
         🎨 럭키 컬러: {}\n\
         🔢 럭키 넘버: {}\n\
         \n\
         나도 해보기 👉 {}",
        c.name,
        c.korean_name,
        c.symbol,
        c.element,
        outcome.compatibility,
        outcome.lucky_item,
        outcome.lucky_color,
        outcome.lucky_number,
        origin.trim_end_matches('/'),
    )
}
