//! 本地存储服务 - 业务能力层
//!
//! 只负责"读写题库、历史记录、收藏"能力，数据以 JSON 文件保存在数据目录中。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, StoreError};
use crate::models::library::{SavedFile, TestHistory};

const LIBRARY_FILE: &str = "quiz_library.json";
const HISTORY_FILE: &str = "quiz_history.json";
const BOOKMARKS_FILE: &str = "quiz_bookmarks.json";
const PROGRESS_FILE: &str = "quiz_progress.json";

/// 文件名 → 已答对的题目 ID
type Progress = BTreeMap<String, BTreeSet<String>>;

/// 本地存储服务
///
/// 职责：
/// - 题库：最近加载的文件及其题目，同名文件只保存一次
/// - 历史记录：每轮答题的得分
/// - 收藏：题目 ID 集合
/// - 学习进度：每个文件中已经答对的题目 ID
/// - 文件缺失或损坏时按空数据处理，损坏的文件备份为 `*.bak`
pub struct QuizStore {
    data_dir: PathBuf,
    library_limit: usize,
    history_limit: usize,
}

impl QuizStore {
    /// 创建新的存储服务
    pub fn new(config: &Config) -> Self {
        Self::with_dir(&config.data_dir, config.library_limit, config.history_limit)
    }

    /// 使用自定义目录创建
    pub fn with_dir(
        data_dir: impl AsRef<Path>,
        library_limit: usize,
        history_limit: usize,
    ) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            library_limit,
            history_limit,
        }
    }

    // ========== 题库 ==========

    /// 读取题库（最新的在前）
    pub async fn library(&self) -> Vec<SavedFile> {
        self.load_or_default(LIBRARY_FILE).await
    }

    /// 把文件加入题库
    ///
    /// 同名文件已存在时不重复添加，返回 `false`
    pub async fn add_to_library(&self, file: SavedFile) -> AppResult<bool> {
        let mut library = self.library().await;
        if library.iter().any(|f| f.name == file.name) {
            debug!("题库中已存在同名文件: {}", file.name);
            return Ok(false);
        }

        library.insert(0, file);
        library.truncate(self.library_limit);
        self.save(LIBRARY_FILE, &library).await?;
        Ok(true)
    }

    /// 按 ID 查找题库中的文件
    pub async fn find_in_library(&self, id: &str) -> AppResult<SavedFile> {
        self.library()
            .await
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::FileNotFound { id: id.to_string() }.into())
    }

    /// 从题库删除文件
    pub async fn remove_from_library(&self, id: &str) -> AppResult<()> {
        let mut library = self.library().await;
        let before = library.len();
        library.retain(|f| f.id != id);

        if library.len() == before {
            return Err(StoreError::FileNotFound { id: id.to_string() }.into());
        }
        self.save(LIBRARY_FILE, &library).await
    }

    // ========== 历史记录 ==========

    /// 读取历史记录（最新的在前）
    pub async fn history(&self) -> Vec<TestHistory> {
        self.load_or_default(HISTORY_FILE).await
    }

    /// 追加一条历史记录
    pub async fn push_history(&self, entry: TestHistory) -> AppResult<()> {
        let mut history = self.history().await;
        history.insert(0, entry);
        history.truncate(self.history_limit);
        self.save(HISTORY_FILE, &history).await
    }

    // ========== 收藏 ==========

    /// 读取收藏的题目 ID
    pub async fn bookmarks(&self) -> BTreeSet<String> {
        self.load_or_default(BOOKMARKS_FILE).await
    }

    /// 切换收藏状态，返回切换后是否已收藏
    pub async fn toggle_bookmark(&self, question_id: &str) -> AppResult<bool> {
        let mut bookmarks = self.bookmarks().await;
        let bookmarked = if bookmarks.remove(question_id) {
            false
        } else {
            bookmarks.insert(question_id.to_string());
            true
        };

        self.save(BOOKMARKS_FILE, &bookmarks).await?;
        Ok(bookmarked)
    }

    // ========== 学习进度 ==========

    /// 读取某个文件中已答对的题目 ID
    pub async fn solved(&self, file_name: &str) -> BTreeSet<String> {
        let mut progress: Progress = self.load_or_default(PROGRESS_FILE).await;
        progress.remove(file_name).unwrap_or_default()
    }

    /// 记录答对的题目
    pub async fn mark_solved<I>(&self, file_name: &str, question_ids: I) -> AppResult<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut progress: Progress = self.load_or_default(PROGRESS_FILE).await;
        progress
            .entry(file_name.to_string())
            .or_default()
            .extend(question_ids);
        self.save(PROGRESS_FILE, &progress).await
    }

    /// 清空某个文件的学习进度
    pub async fn reset_progress(&self, file_name: &str) -> AppResult<()> {
        let mut progress: Progress = self.load_or_default(PROGRESS_FILE).await;
        if progress.remove(file_name).is_some() {
            self.save(PROGRESS_FILE, &progress).await?;
        }
        Ok(())
    }

    // ========== 辅助函数 ==========

    async fn load_or_default<T: DeserializeOwned + Default>(&self, file_name: &str) -> T {
        let path = self.data_dir.join(file_name);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!("读取 {} 失败，按空数据处理: {}", path.display(), e);
                return T::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("解析 {} 失败，按空数据处理: {}", path.display(), e);
                self.backup_corrupt(&path).await;
                T::default()
            }
        }
    }

    /// 把无法解析的文件改名为 `*.bak`，避免下次保存时覆盖原数据
    async fn backup_corrupt(&self, path: &Path) {
        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        match fs::rename(path, &backup).await {
            Ok(()) => warn!("⚠️ 已将损坏的文件备份为 {}", backup.display()),
            Err(e) => warn!("备份 {} 失败: {}", path.display(), e),
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> AppResult<()> {
        let path = self.data_dir.join(file_name);
        let json = serde_json::to_string_pretty(value).map_err(StoreError::from)?;

        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::WriteFailed {
                path: self.data_dir.display().to_string(),
                source,
            })?;
        fs::write(&path, json)
            .await
            .map_err(|source| StoreError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;

        debug!("已保存 {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::library::QuizMode;

    fn store(dir: &Path) -> QuizStore {
        QuizStore::with_dir(dir, 3, 2)
    }

    fn saved(name: &str, id: &str) -> SavedFile {
        SavedFile {
            id: id.to_string(),
            name: name.to_string(),
            questions: Vec::new(),
            timestamp: 0,
        }
    }

    fn history(score: usize) -> TestHistory {
        TestHistory {
            file_name: "a.docx".to_string(),
            date: 0,
            score,
            total: 5,
            mode: QuizMode::Test,
        }
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(store.library().await.is_empty());
        assert!(store.history().await.is_empty());
        assert!(store.bookmarks().await.is_empty());
    }

    #[tokio::test]
    async fn test_library_dedupes_by_name_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(store.add_to_library(saved("a.docx", "1")).await.unwrap());
        assert!(!store.add_to_library(saved("a.docx", "2")).await.unwrap());
        for (name, id) in [("b.docx", "3"), ("c.docx", "4"), ("d.docx", "5")] {
            store.add_to_library(saved(name, id)).await.unwrap();
        }

        let names: Vec<String> = store.library().await.into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["d.docx", "c.docx", "b.docx"]);
    }

    #[tokio::test]
    async fn test_remove_from_library() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.add_to_library(saved("a.docx", "1")).await.unwrap();

        store.remove_from_library("1").await.unwrap();
        assert!(store.library().await.is_empty());
        assert!(store.remove_from_library("1").await.is_err());
        assert!(store.find_in_library("1").await.is_err());
    }

    #[tokio::test]
    async fn test_history_newest_first_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        for score in 1..=3 {
            store.push_history(history(score)).await.unwrap();
        }

        let scores: Vec<usize> = store.history().await.into_iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_bookmark_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();

        assert!(store(dir.path()).toggle_bookmark("q-2p").await.unwrap());
        assert!(store(dir.path()).bookmarks().await.contains("q-2p"));
        assert!(!store(dir.path()).toggle_bookmark("q-2p").await.unwrap());
        assert!(store(dir.path()).bookmarks().await.is_empty());
    }

    #[tokio::test]
    async fn test_progress_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store
            .mark_solved("a.docx", vec!["q-1".to_string(), "q-2".to_string()])
            .await
            .unwrap();
        store.mark_solved("b.docx", vec!["q-3".to_string()]).await.unwrap();

        assert_eq!(store.solved("a.docx").await.len(), 2);
        store.reset_progress("a.docx").await.unwrap();
        assert!(store.solved("a.docx").await.is_empty());
        assert!(store.solved("b.docx").await.contains("q-3"));
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BOOKMARKS_FILE), "{not json").unwrap();

        assert!(store(dir.path()).bookmarks().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_backed_up_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let library_path = dir.path().join(LIBRARY_FILE);
        std::fs::write(&library_path, "[{broken").unwrap();

        let store = store(dir.path());
        assert!(store.add_to_library(saved("a.docx", "1")).await.unwrap());

        let backup = dir.path().join(format!("{}.bak", LIBRARY_FILE));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "[{broken");
        assert_eq!(store.library().await.len(), 1);
    }
}
