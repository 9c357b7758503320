/// One row of the device's `vocabulary` table.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabEntry {
    pub create_time: i64,      // ⇔ vocabulary.create_time (unix seconds)
    pub word: String,          // ⇔ vocabulary.word
    pub title_id: i64,         // ⇔ vocabulary.title_id → title.id
    pub prev_context: Option<String>,
    pub next_context: Option<String>,
}
