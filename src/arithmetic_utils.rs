/// Sums the iterator strictly left to right, starting from `+0.0`.
///
/// Every element is added to the accumulator in iteration order with plain
/// `f64` addition, so the rounding matches a sequential loop exactly.
/// NaN and infinities propagate as IEEE-754 says.
///
/// `Iterator::sum` is not used here since it starts from `-0.0`.
pub fn sum(arr: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    for x in arr {
        sum += x;
    }
    sum
}

/// Yields the accumulator after each element, so the last item is `sum(arr)`.
pub fn running_sums(arr: impl IntoIterator<Item = f64>) -> impl Iterator<Item = f64> {
    arr.into_iter().scan(0.0, |acc: &mut f64, x| {
        *acc += x;
        Some(*acc)
    })
}
