use std::io;

use thiserror::Error;

use super::{
    GenderDirectory, Prompt, RawTable, RECIPIENT_COLUMN, RECIPIENT_GENDER_COLUMN, SENDER_COLUMN,
    SENDER_GENDER_COLUMN, TEXT_COLUMN,
};

#[derive(Debug, Error)]
pub(crate) enum EnrichError {
    #[error("missing required column '{name}'")]
    MissingColumn { name: &'static str },
    #[error("number of participants in this conversation is not 2; they were: {participants:?}")]
    ParticipantCount { participants: Vec<String> },
    #[error("prompt failed: {0}")]
    Prompt(#[from] io::Error),
}

// The validated shape of one conversation file: which rows survive filtering
// and who the two participants are.
struct BatchShape {
    sender_idx: usize,
    kept: Vec<usize>,
    participants: Vec<String>,
}

fn batch_shape(table: &RawTable) -> Result<BatchShape, EnrichError> {
    let sender_idx = table
        .column(SENDER_COLUMN)
        .ok_or(EnrichError::MissingColumn { name: SENDER_COLUMN })?;
    let text_idx = table
        .column(TEXT_COLUMN)
        .ok_or(EnrichError::MissingColumn { name: TEXT_COLUMN })?;

    // Rows with no sender or no text carry nothing to enrich and must not
    // influence participant discovery.
    let kept: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row[sender_idx].is_empty() && !row[text_idx].is_empty())
        .map(|(idx, _)| idx)
        .collect();

    // Distinct senders in first-seen order.
    let mut participants: Vec<String> = Vec::new();
    for &idx in &kept {
        let sender = &table.rows[idx][sender_idx];
        if !participants.contains(sender) {
            participants.push(sender.clone());
        }
    }

    if participants.len() != 2 {
        return Err(EnrichError::ParticipantCount { participants });
    }

    Ok(BatchShape {
        sender_idx,
        kept,
        participants,
    })
}

/// Participant validation only: the checks `enrich_table` would run before
/// its first prompt. Returns the number of rows that would be written.
pub(crate) fn validate_batch(table: &RawTable) -> Result<usize, EnrichError> {
    batch_shape(table).map(|shape| shape.kept.len())
}

/// Turn a raw conversation table into an enriched one, or reject the batch.
///
/// Each surviving row gains the other participant as its recipient plus both
/// parties' genders, resolved through the directory (prompting the operator
/// for numbers it has never seen, in row order). Rejection is whole-batch: a
/// conversation without exactly two participants produces no output rows.
pub(crate) fn enrich_table(
    table: &RawTable,
    genders: &mut GenderDirectory,
    prompt: &mut dyn Prompt,
) -> Result<RawTable, EnrichError> {
    let shape = batch_shape(table)?;

    let mut enriched = RawTable {
        headers: table.headers.clone(),
        rows: Vec::with_capacity(shape.kept.len()),
    };
    enriched.headers.push(RECIPIENT_COLUMN.to_string());
    enriched.headers.push(SENDER_GENDER_COLUMN.to_string());
    enriched.headers.push(RECIPIENT_GENDER_COLUMN.to_string());

    for &idx in &shape.kept {
        let row = &table.rows[idx];
        let sender = &row[shape.sender_idx];
        let recipient = if *sender == shape.participants[0] {
            shape.participants[1].clone()
        } else if *sender == shape.participants[1] {
            shape.participants[0].clone()
        } else {
            // Participant discovery ran over these same rows, so this cannot
            // happen; report it rather than crash the batch.
            eprintln!("Error: sender {sender} is not a conversation participant; dropping row");
            continue;
        };

        let sender_gender = genders.resolve(sender, prompt)?;
        let recipient_gender = genders.resolve(&recipient, prompt)?;

        let mut out = row.clone();
        out.push(recipient);
        out.push(sender_gender.as_str().to_string());
        out.push(recipient_gender.as_str().to_string());
        enriched.rows.push(out);
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, ScriptedPrompt};

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|f| f.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_two_party_enrichment_with_fresh_cache() {
        let raw = table(
            &["#sender", "text"],
            &[&["A", "hi"], &["B", "yo"]],
        );
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&["m", "f"]);

        let enriched = enrich_table(&raw, &mut genders, &mut prompt).unwrap();

        assert_eq!(
            enriched.headers,
            vec!["#sender", "text", "#recipient", "senderGender", "recipientGender"]
        );
        assert_eq!(
            enriched.rows,
            vec![
                vec!["A", "hi", "B", "m", "f"],
                vec!["B", "yo", "A", "f", "m"],
            ]
        );
        // One prompt per unknown number, in row order.
        assert_eq!(prompt.asked, vec!["A", "B"]);
        assert_eq!(genders.get("A"), Some(Gender::Male));
        assert_eq!(genders.get("B"), Some(Gender::Female));
    }

    #[test]
    fn test_recipient_is_always_the_other_participant() {
        let raw = table(
            &["#sender", "text"],
            &[&["A", "1"], &["A", "2"], &["B", "3"], &["A", "4"], &["B", "5"]],
        );
        let mut genders = GenderDirectory::default();
        genders.insert("A", Gender::Male);
        genders.insert("B", Gender::Female);
        let mut prompt = ScriptedPrompt::new(&[]);

        let enriched = enrich_table(&raw, &mut genders, &mut prompt).unwrap();
        let sender_idx = enriched.column("#sender").unwrap();
        let recipient_idx = enriched.column("#recipient").unwrap();
        for row in &enriched.rows {
            assert_ne!(row[sender_idx], row[recipient_idx]);
            let expected = if row[sender_idx] == "A" { "B" } else { "A" };
            assert_eq!(row[recipient_idx], expected);
        }
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_prepopulated_cache_never_prompts() {
        let raw = table(&["#sender", "text"], &[&["+15550001111", "hi"], &["B", "yo"]]);
        let mut genders = GenderDirectory::default();
        genders.insert("+15550001111", Gender::Female);
        genders.insert("B", Gender::Male);
        let mut prompt = ScriptedPrompt::new(&[]);

        let enriched = enrich_table(&raw, &mut genders, &mut prompt).unwrap();
        let gender_idx = enriched.column("senderGender").unwrap();
        assert_eq!(enriched.rows[0][gender_idx], "f");
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_single_participant_rejected() {
        let raw = table(&["#sender", "text"], &[&["A", "hi"], &["A", "still me"]]);
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&[]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        match err {
            EnrichError::ParticipantCount { participants } => {
                assert_eq!(participants, vec!["A"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let raw = table(&["#sender", "text"], &[]);
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&[]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::ParticipantCount { ref participants } if participants.is_empty()
        ));
    }

    #[test]
    fn test_three_participants_rejected() {
        let raw = table(
            &["#sender", "text"],
            &[&["A", "hi"], &["B", "yo"], &["C", "me too"]],
        );
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&[]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::ParticipantCount { ref participants } if participants.len() == 3
        ));
    }

    #[test]
    fn test_blank_rows_invisible_to_discovery() {
        // The blank-text row is B's only appearance, so filtering leaves a
        // one-participant conversation.
        let raw = table(
            &["#sender", "text", "other"],
            &[&["A", "hi", ""], &["B", "", "x"], &["A", "yo", ""]],
        );
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&[]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        assert!(matches!(
            err,
            EnrichError::ParticipantCount { ref participants } if participants == &vec!["A".to_string()]
        ));
    }

    #[test]
    fn test_blank_sender_rows_dropped_from_output() {
        let raw = table(
            &["#sender", "text"],
            &[&["A", "hi"], &["", "ghost"], &["B", "yo"]],
        );
        let mut genders = GenderDirectory::default();
        genders.insert("A", Gender::Male);
        genders.insert("B", Gender::Female);
        let mut prompt = ScriptedPrompt::new(&[]);
        let enriched = enrich_table(&raw, &mut genders, &mut prompt).unwrap();
        assert_eq!(enriched.rows.len(), 2);
    }

    #[test]
    fn test_passthrough_columns_preserved() {
        let raw = table(
            &["ts", "#sender", "text", "attachment"],
            &[
                &["100", "A", "hi", "photo.jpg"],
                &["101", "B", "yo", ""],
            ],
        );
        let mut genders = GenderDirectory::default();
        genders.insert("A", Gender::Male);
        genders.insert("B", Gender::Female);
        let mut prompt = ScriptedPrompt::new(&[]);

        let enriched = enrich_table(&raw, &mut genders, &mut prompt).unwrap();
        assert_eq!(
            enriched.headers,
            vec!["ts", "#sender", "text", "attachment", "#recipient", "senderGender", "recipientGender"]
        );
        assert_eq!(enriched.rows[0][0], "100");
        assert_eq!(enriched.rows[0][3], "photo.jpg");
    }

    #[test]
    fn test_missing_sender_column_rejected() {
        let raw = table(&["from", "text"], &[&["A", "hi"]]);
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&[]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        assert!(matches!(err, EnrichError::MissingColumn { name: "#sender" }));
    }

    #[test]
    fn test_prompt_error_propagates() {
        let raw = table(&["#sender", "text"], &[&["A", "hi"], &["B", "yo"]]);
        let mut genders = GenderDirectory::default();
        let mut prompt = ScriptedPrompt::new(&["m"]);
        let err = enrich_table(&raw, &mut genders, &mut prompt).unwrap_err();
        assert!(matches!(err, EnrichError::Prompt(_)));
        // The answer that did arrive is kept.
        assert_eq!(genders.get("A"), Some(Gender::Male));
    }

    #[test]
    fn test_validate_batch_counts_surviving_rows() {
        let raw = table(
            &["#sender", "text"],
            &[&["A", "hi"], &["", ""], &["B", "yo"]],
        );
        assert_eq!(validate_batch(&raw).unwrap(), 2);
    }
}
