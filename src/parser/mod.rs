//! 题目解析
//!
//! 从纯文本行中识别题目和选项：
//!
//! - `classifier` - 行分类（题目开始 / 选项开始 / 续行）
//! - `builder` - 累积题干和选项，第一个选项为正确答案
//! - `id` - 由题干生成稳定 ID（用于收藏）
//! - `shuffle` - 打乱选项展示顺序
//!
//! 格式不完整的题目块（没有选项、题干为空）会被静默丢弃；
//! 一道题都没识别出来时返回空列表而不是错误。

pub mod builder;
pub mod classifier;
pub mod id;
pub mod shuffle;

pub use builder::QuestionBuilder;
pub use classifier::{classify, LineKind};
pub use id::stable_id;
pub use shuffle::{shuffle_answers, shuffle_answers_with};

use rand::{thread_rng, Rng};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ExtractError};
use crate::infrastructure::{extractor_for_path, TextExtractor};
use crate::models::question::Question;

/// 解析文本行
pub fn parse_lines<I, S>(lines: I) -> Vec<Question>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines_with(lines, &mut thread_rng())
}

/// 使用指定随机数生成器解析文本行
pub fn parse_lines_with<I, S, R>(lines: I, rng: &mut R) -> Vec<Question>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut builder = QuestionBuilder::new();
    for line in lines {
        if let Some(kind) = classify(line.as_ref().trim_end()) {
            builder.push(kind, rng);
        }
    }
    builder.finish(rng)
}

/// 解析整段文本（按换行拆分）
pub fn parse_text(text: &str) -> Vec<Question> {
    parse_lines(text.split('\n'))
}

/// 用指定的提取器解析文档字节
///
/// 提取失败时返回一个统一的“无法读取文件”错误，不返回部分结果。
pub fn parse_bytes(
    name: &str,
    bytes: &[u8],
    extractor: &dyn TextExtractor,
) -> AppResult<Vec<Question>> {
    let text = extractor.extract_text(bytes).map_err(|e| {
        tracing::error!("解析文件 {} 失败: {}", name, e);
        AppError::document_unreadable(name, e)
    })?;

    debug!("文件 {} 提取到 {} 个字符", name, text.chars().count());
    let questions = parse_text(&text);
    info!("✓ 文件 {} 识别出 {} 道题", name, questions.len());

    Ok(questions)
}

/// 读取并解析文档文件（根据扩展名选择提取器）
pub async fn parse_document(path: &Path) -> AppResult<Vec<Question>> {
    let name = path.display().to_string();

    let extractor = extractor_for_path(path).map_err(|e| AppError::document_unreadable(&name, e))?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::document_unreadable(&name, ExtractError::Io(e)))?;

    parse_bytes(&name, &bytes, extractor.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;

    fn assert_well_formed(questions: &[Question]) {
        for q in questions {
            assert!(!q.text.is_empty());
            assert!(!q.answers.is_empty());
            assert_eq!(q.answers.len(), q.shuffled_answers.len());
            assert_eq!(q.shuffled_answers.iter().filter(|a| a.is_correct).count(), 1);
            assert_eq!(q.answers.iter().filter(|a| a.is_correct).count(), 1);
            assert!(q.shuffled_answers[q.correct_index].is_correct);
        }
    }

    #[test]
    fn test_scenario_single_question() {
        let questions = parse_lines(["1. What is 2+2?", "a) 4", "b) 5", "c) 6"]);

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.text, "What is 2+2?");
        assert_eq!(q.answers.len(), 3);
        assert_eq!(q.answers[0].text, "4");
        assert!(q.answers[0].is_correct);
        assert_eq!(q.correct_answer().unwrap().text, "4");
        assert_well_formed(&questions);
    }

    #[test]
    fn test_scenario_continuation_on_later_answer() {
        let questions = parse_lines(["1. What is 2+2?", "a) 4", "b) 5", "5 again continued"]);

        let q = &questions[0];
        assert_eq!(q.answers[1].text, "5 5 again continued");
        assert!(!q.answers[1].is_correct);
        assert_eq!(q.correct_answer().unwrap().text, "4");
        assert_well_formed(&questions);
    }

    #[test]
    fn test_scenario_multiline_question() {
        let questions =
            parse_lines(["5. Long question", "continued on next line", "a) Only answer"]);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Long question continued on next line");
        assert_eq!(questions[0].answers.len(), 1);
        assert_eq!(questions[0].correct_index, 0);
        assert!(questions[0].answers[0].is_correct);
    }

    #[test]
    fn test_scenario_question_without_answers_dropped() {
        let questions = parse_lines([
            "1. No answers here",
            "still no answers",
            "2. Has answers",
            "a) yes",
        ]);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Has answers");
    }

    #[test]
    fn test_scenario_empty_input() {
        assert!(parse_text("").is_empty());
        assert!(parse_text("\n\n   \n").is_empty());
    }

    #[test]
    fn test_document_order_and_crlf() {
        let text = "1. Первый вопрос\r\nа) да\r\nб) нет\r\n\r\n2) Второй вопрос\r\nА. верно\r\nБ. неверно\r\n";
        let questions = parse_text(text);

        let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Первый вопрос", "Второй вопрос"]);
        assert_eq!(questions[1].correct_answer().unwrap().text, "верно");
        assert_well_formed(&questions);
    }

    #[test]
    fn test_ids_stable_across_parses() {
        let lines = ["1. Same text", "a) x", "b) y", "2. Other", "a) z"];
        let first = parse_lines(lines);
        let second = parse_lines(lines);

        let ids = |qs: &[Question]| qs.iter().map(|q| q.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first[0].id, stable_id("Same text"));
        // 原始顺序不受打乱影响
        assert_eq!(first[0].answers, second[0].answers);
    }

    #[test]
    fn test_parse_bytes_reports_unreadable() {
        let err =
            parse_bytes("broken.docx", b"not a zip", &crate::infrastructure::DocxTextExtractor)
                .unwrap_err();

        assert!(matches!(
            err,
            AppError::Document(DocumentError::Unreadable { ref path, .. }) if path == "broken.docx"
        ));
    }

    #[test]
    fn test_docx_line_break_continues_answer() {
        use std::io::Write;

        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>1. Longest river?</w:t></w:r></w:p>
<w:p><w:r><w:t>a) The Nile in</w:t><w:br/><w:t>Africa</w:t></w:r></w:p>
<w:p><w:r><w:t>b) The Volga</w:t></w:r></w:p>
</w:body></w:document>"#;
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let questions = parse_bytes(
            "river.docx",
            &buf.into_inner(),
            &crate::infrastructure::DocxTextExtractor,
        )
        .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answers.len(), 2);
        assert_eq!(questions[0].correct_answer().unwrap().text, "The Nile in Africa");
        assert_well_formed(&questions);
    }

    #[tokio::test]
    async fn test_parse_document_from_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.txt");
        tokio::fs::write(&path, "1. Q\na) A\nb) B\n").await.unwrap();

        let questions = parse_document(&path).await.unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn test_parse_document_missing_file() {
        let err = parse_document(Path::new("/nonexistent/quiz.docx")).await.unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
    }
}
