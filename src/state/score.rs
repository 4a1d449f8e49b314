/// Score after a correct answer
pub fn award(score: i32, delta: i32) -> i32 {
    score.saturating_add(delta)
}

/// Score after an incorrect answer. With `floor_at_zero` the result never
/// drops below zero; otherwise it may go negative.
pub fn deduct(score: i32, delta: i32, floor_at_zero: bool) -> i32 {
    let next = score.saturating_sub(delta);
    if floor_at_zero {
        next.max(0)
    } else {
        next
    }
}
