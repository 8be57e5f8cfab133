use crate::model::{Row, TextFragment};
use std::collections::BTreeMap;

/// Bucket index of a Y coordinate for the given quantization step.
///
/// Uses `f32::round`, i.e. halves round away from zero. Page coordinates are
/// non-negative, so a fragment exactly between two multiples joins the upper
/// bucket (97.5 with a step of 5 lands in bucket 100).
pub fn bucket_index(y: f32, threshold: f32) -> i64 {
    (y / threshold).round() as i64
}

/// Y rounded to the nearest multiple of `threshold`.
pub fn quantize(y: f32, threshold: f32) -> f32 {
    bucket_index(y, threshold) as f32 * threshold
}

/// Group a page's fragments into rows by quantized Y.
///
/// Rows come back top-to-bottom (descending Y, since PDF Y grows upward) and
/// the fragments of each row are sorted left-to-right. Bucketing is keyed on
/// the integer bucket index, so the result does not depend on input order.
pub fn cluster_rows(fragments: &[TextFragment], threshold: f32) -> Vec<Row<'_>> {
    let mut buckets: BTreeMap<i64, Vec<&TextFragment>> = BTreeMap::new();
    for fragment in fragments {
        buckets
            .entry(bucket_index(fragment.y, threshold))
            .or_default()
            .push(fragment);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(index, mut members)| {
            members.sort_by(|a, b| a.x.total_cmp(&b.x));
            Row {
                quantized_y: index as f32 * threshold,
                fragments: members,
            }
        })
        .collect()
}

/// Page text in visual reading order: one line per row cluster.
pub fn reading_text(fragments: &[TextFragment], threshold: f32) -> String {
    cluster_rows(fragments, threshold)
        .iter()
        .map(|row| row.text())
        .collect::<Vec<_>>()
        .join("\n")
}
