use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use color_eyre::Result;

use crate::db::question::{NewAnswerOption, NewQuestion};
use crate::db::{Db, Language};

/// Expected columns (0-indexed): question text, question type (ignored),
/// option 1..4, correct answer (1-4), time limit (ignored), image link,
/// explanation. The first row is a header and is skipped.
const COL_TEXT: usize = 0;
const COL_OPTION_1: usize = 2;
const COL_CORRECT: usize = 6;
const COL_IMAGE: usize = 8;
const COL_EXPLANATION: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub success: bool,
    pub questions_imported: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    fn failed(message: String) -> Self {
        Self {
            success: false,
            questions_imported: 0,
            errors: vec![message],
        }
    }
}

/// Parses an uploaded spreadsheet and appends the valid rows to the round's
/// question set for one language. Bad rows are reported with their row number
/// and skipped; the rest import anyway.
pub async fn import_questions(
    db: &Db,
    round_id: i32,
    language: Language,
    filename: &str,
    bytes: &[u8],
) -> Result<ImportResult> {
    let lower = filename.to_lowercase();
    let mut errors = Vec::new();

    let questions = if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        match parse_workbook(bytes, &mut errors) {
            Ok(questions) => questions,
            Err(e) => return Ok(ImportResult::failed(format!("Could not read file: {e}"))),
        }
    } else if lower.ends_with(".csv") {
        parse_csv(bytes, &mut errors)
    } else {
        return Ok(ImportResult::failed(
            "Unsupported file format. Please use .xlsx, .xls, or .csv".to_string(),
        ));
    };

    if questions.is_empty() && errors.is_empty() {
        return Ok(ImportResult::failed("No questions found in file".to_string()));
    }

    let questions_imported = if questions.is_empty() {
        0
    } else {
        db.insert_questions(round_id, language, &questions).await?
    };

    Ok(ImportResult {
        success: errors.is_empty(),
        questions_imported,
        errors,
    })
}

fn parse_workbook(bytes: &[u8], errors: &mut Vec<String>) -> Result<Vec<NewQuestion>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| color_eyre::eyre::eyre!("workbook has no sheets"))??;

    let mut questions = Vec::new();
    for (i, row) in range.rows().enumerate().skip(1) {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if let Some(question) = parse_row(&cells, i + 1, errors) {
            questions.push(question);
        }
    }

    Ok(questions)
}

fn parse_csv(bytes: &[u8], errors: &mut Vec<String>) -> Vec<NewQuestion> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut questions = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Row 1 is the header, so the first data row is row 2.
        let row_number = i + 2;
        match record {
            Ok(record) => {
                let cells: Vec<String> =
                    record.iter().map(|c| c.trim().to_string()).collect();
                if let Some(question) = parse_row(&cells, row_number, errors) {
                    questions.push(question);
                }
            }
            Err(e) => errors.push(format!("Row {row_number}: {e}")),
        }
    }

    questions
}

/// One spreadsheet row to one question, or `None` with the reason recorded.
/// Rows that are entirely blank are skipped without an error.
fn parse_row(cells: &[String], row_number: usize, errors: &mut Vec<String>) -> Option<NewQuestion> {
    if cells.iter().all(|c| c.trim().is_empty()) {
        return None;
    }

    let non_blank = |index: usize| -> Option<String> {
        cells
            .get(index)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    };

    let text = non_blank(COL_TEXT);
    let image_filename = non_blank(COL_IMAGE);

    if text.is_none() && image_filename.is_none() {
        errors.push(format!("Row {row_number}: question must have text or an image"));
        return None;
    }

    let correct_raw = cells.get(COL_CORRECT).map(|c| c.trim()).unwrap_or("");
    let correct_answer = match correct_raw.parse::<usize>() {
        Ok(n) if (1..=4).contains(&n) => n,
        _ => {
            errors.push(format!(
                "Row {row_number}: correct answer must be 1-4, got: {correct_raw}"
            ));
            return None;
        }
    };

    let mut options = Vec::with_capacity(4);
    for i in 0..4 {
        let Some(option_text) = non_blank(COL_OPTION_1 + i) else {
            errors.push(format!("Row {row_number}: option {} is empty", i + 1));
            return None;
        };
        options.push(NewAnswerOption {
            text: option_text,
            correct: i + 1 == correct_answer,
        });
    }

    Some(NewQuestion {
        text,
        image_filename,
        explanation: non_blank(COL_EXPLANATION),
        options,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn full_row(text: &str, correct: &str) -> Vec<String> {
        row(&[text, "Multiple Choice", "A", "B", "C", "D", correct, "10", "", ""])
    }

    #[test]
    fn valid_row_becomes_a_question() {
        let mut errors = Vec::new();
        let question = parse_row(&full_row("What is 1+1?", "2"), 2, &mut errors).unwrap();

        assert!(errors.is_empty());
        assert_eq!(question.text.as_deref(), Some("What is 1+1?"));
        assert_eq!(question.options.len(), 4);
        assert!(question.options[1].correct);
        assert_eq!(question.options.iter().filter(|o| o.correct).count(), 1);
    }

    #[test]
    fn blank_row_is_skipped_silently() {
        let mut errors = Vec::new();
        let question = parse_row(&row(&["", "", "", "", "", "", "", "", "", ""]), 4, &mut errors);

        assert!(question.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn out_of_range_correct_answer_is_rejected_with_row_number() {
        let mut errors = Vec::new();
        let question = parse_row(&full_row("Question?", "5"), 7, &mut errors);

        assert!(question.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Row 7"));
        assert!(errors[0].contains("1-4"));
    }

    #[test]
    fn unparsable_correct_answer_is_rejected() {
        let mut errors = Vec::new();
        let question = parse_row(&full_row("Question?", "two"), 3, &mut errors);

        assert!(question.is_none());
        assert!(errors[0].contains("Row 3"));
    }

    #[test]
    fn question_without_text_or_image_is_rejected() {
        let mut errors = Vec::new();
        let cells = row(&["", "Multiple Choice", "A", "B", "C", "D", "1", "", "", ""]);
        let question = parse_row(&cells, 5, &mut errors);

        assert!(question.is_none());
        assert!(errors[0].contains("Row 5"));
        assert!(errors[0].contains("text or an image"));
    }

    #[test]
    fn image_only_question_is_accepted() {
        let mut errors = Vec::new();
        let cells = row(&[
            "", "Multiple Choice", "A", "B", "C", "D", "3", "10", "questions/pic.png", "",
        ]);
        let question = parse_row(&cells, 2, &mut errors).unwrap();

        assert!(errors.is_empty());
        assert!(question.text.is_none());
        assert_eq!(question.image_filename.as_deref(), Some("questions/pic.png"));
        assert!(question.options[2].correct);
    }

    #[test]
    fn blank_option_rejects_the_row() {
        let mut errors = Vec::new();
        let cells = row(&["Question?", "", "A", "", "C", "D", "1", "", "", ""]);
        let question = parse_row(&cells, 9, &mut errors);

        assert!(question.is_none());
        assert!(errors[0].contains("Row 9"));
        assert!(errors[0].contains("option 2"));
    }

    #[test]
    fn explanation_is_carried_through() {
        let mut errors = Vec::new();
        let cells = row(&[
            "Question?", "", "A", "B", "C", "D", "4", "", "", "Because D.",
        ]);
        let question = parse_row(&cells, 2, &mut errors).unwrap();

        assert_eq!(question.explanation.as_deref(), Some("Because D."));
        assert!(question.options[3].correct);
    }

    #[test]
    fn csv_header_is_skipped_and_rows_parse() {
        let csv = "\
Text,Type,Option1,Option2,Option3,Option4,Correct,Time,Image,Explanation
What is 1+1?,MC,1,2,3,4,2,10,,
What is 2+2?,MC,2,3,4,5,3,10,,arithmetic
";
        let mut errors = Vec::new();
        let questions = parse_csv(csv.as_bytes(), &mut errors);

        assert!(errors.is_empty());
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text.as_deref(), Some("What is 1+1?"));
        assert!(questions[0].options[1].correct);
        assert_eq!(questions[1].explanation.as_deref(), Some("arithmetic"));
    }

    #[test]
    fn csv_bad_row_is_reported_and_good_rows_survive() {
        let csv = "\
Text,Type,Option1,Option2,Option3,Option4,Correct,Time,Image,Explanation
Good question?,MC,A,B,C,D,1,10,,
Bad question?,MC,A,B,C,D,9,10,,
,,,,,,,,,
Another good?,MC,A,B,C,D,4,10,,
";
        let mut errors = Vec::new();
        let questions = parse_csv(csv.as_bytes(), &mut errors);

        assert_eq!(questions.len(), 2);
        assert_eq!(errors.len(), 1);
        // The bad row is the second data row: spreadsheet row 3.
        assert!(errors[0].contains("Row 3"));
    }

    #[test]
    fn numeric_cells_render_without_decimals() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(4)), "4");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
