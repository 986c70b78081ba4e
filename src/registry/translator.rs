//! 読み込み済みロケールと現在のロケールを管理するレジストリ

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
    RwLockReadGuard,
    RwLockWriteGuard,
};
use std::thread;

use super::TranslatorError;
use crate::config::{
    ConfigManager,
    TradSettings,
};
use crate::input::{
    LoadError,
    LocaleFile,
    find_locale_file,
    find_locale_files,
    load_translation_file,
};
use crate::ir::TranslationTree;
use crate::syntax::parse_locale;

/// ロケール名 → 翻訳ツリー
type TranslationMap = HashMap<String, Arc<TranslationTree>>;

/// 言語ディレクトリの翻訳ツリーを使ってドット区切りのキーを翻訳する
///
/// ロケールは一度だけ追加され、置き換えや削除はされません。
/// すべてのメソッドは `&self` を取るため、スレッド間で共有する場合は [`Arc`] で包んでください。
///
/// # ロック順序
///
/// 両方のロックが必要な場合は `translations` → `locale` の順に取得してください。
#[derive(Debug)]
pub struct Translator {
    /// ロケールごとのファイルを置くディレクトリ
    lang_dir: PathBuf,
    /// 読み込み設定
    settings: TradSettings,
    /// ロケール名 → 翻訳ツリー
    translations: RwLock<TranslationMap>,
    /// 現在のロケール
    locale: RwLock<Option<String>>,
}

impl Translator {
    /// 空の `Translator` を作成
    ///
    /// [`Self::init`] か [`Self::set_locale`] が呼ばれるまでファイルは読まない
    #[must_use]
    pub fn new(lang_dir: impl Into<PathBuf>, settings: TradSettings) -> Self {
        Self {
            lang_dir: lang_dir.into(),
            settings,
            translations: RwLock::new(HashMap::new()),
            locale: RwLock::new(None),
        }
    }

    /// 読み込み済みの設定から作成
    #[must_use]
    pub fn from_config(config: &ConfigManager) -> Self {
        Self::new(config.lang_dir(), config.get_settings().clone())
    }

    #[must_use]
    pub fn lang_dir(&self) -> &Path {
        &self.lang_dir
    }

    #[must_use]
    pub const fn settings(&self) -> &TradSettings {
        &self.settings
    }

    /// 設定に従って初期化する
    ///
    /// 一括読み込みの場合はここで全ロケールファイルを読み込み、遅延読み込みの場合は
    /// 最初に選択されたときに読み込む。その後、デフォルトロケールがあれば選択する
    /// （他のロケールファイルの読み込みに失敗していても選択する）。
    ///
    /// # Errors
    /// - [`TranslatorError::Load`]: 言語ディレクトリを列挙できない
    /// - [`TranslatorError::LoadFailed`]: 不正なロケールファイルがある
    /// - [`TranslatorError::LocaleNotFound`]: デフォルトロケールが存在しない
    pub fn init(&self) -> Result<(), TranslatorError> {
        tracing::debug!(
            lang_dir = %self.lang_dir.display(),
            lazy = self.settings.lazy_loading,
            "Initializing translator"
        );

        let loaded = if self.settings.lazy_loading {
            Ok(Vec::new())
        } else {
            match self.load_all() {
                Err(error @ TranslatorError::Load(_)) => return Err(error),
                result => result,
            }
        };

        let selected = self
            .settings
            .default_locale
            .as_deref()
            .map_or(Ok(()), |locale| self.set_locale(locale));

        loaded.map(|_| ()).and(selected)
    }

    /// 未読み込みのロケールファイルをすべて並列に読み込む
    ///
    /// 読み込みに失敗したファイルがあっても他のファイルは追加し、失敗はまとめて返す。
    ///
    /// # Returns
    /// この呼び出しで追加されたロケール
    ///
    /// # Errors
    /// - [`TranslatorError::Load`]: 言語ディレクトリを列挙できない
    /// - [`TranslatorError::LoadFailed`]: 読み込みに失敗したファイルがある
    pub fn load_all(&self) -> Result<Vec<String>, TranslatorError> {
        let files = find_locale_files(&self.lang_dir, &self.settings.file_pattern)?;

        let mut translations = self.write_translations();
        let pending: Vec<&LocaleFile> =
            files.iter().filter(|file| !translations.contains_key(&file.locale)).collect();

        let mut loaded = Vec::new();
        let mut errors = Vec::new();
        for result in load_in_parallel(&pending, self.settings.loading.thread_count()) {
            match result {
                Ok(tree) => {
                    let locale = tree.locale().to_string();
                    translations.insert(locale.clone(), Arc::new(tree));
                    loaded.push(locale);
                }
                Err(error) => {
                    tracing::warn!("{error}");
                    errors.push(error);
                }
            }
        }
        drop(translations);

        tracing::debug!(loaded = loaded.len(), failed = errors.len(), "Loaded locale files");
        if errors.is_empty() { Ok(loaded) } else { Err(TranslatorError::LoadFailed(errors)) }
    }

    /// 現在のロケールを切り替える（遅延読み込みの場合は先に読み込む）
    ///
    /// # Errors
    /// - [`TranslatorError::LocaleNotFound`]: ロケールが存在しない
    /// - [`TranslatorError::Load`]: ファイルを読み込めない
    pub fn set_locale(&self, locale: &str) -> Result<(), TranslatorError> {
        if self.settings.lazy_loading {
            self.ensure_loaded(locale)?;
        }

        if !self.read_translations().contains_key(locale) {
            return Err(TranslatorError::LocaleNotFound(locale.to_string()));
        }

        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = Some(locale.to_string());
        tracing::debug!(locale, "Active locale changed");
        Ok(())
    }

    /// 現在のロケールを取得
    ///
    /// # Errors
    /// [`TranslatorError::NoLocaleSet`]: まだ [`Self::set_locale`] が呼ばれていない
    pub fn locale(&self) -> Result<String, TranslatorError> {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TranslatorError::NoLocaleSet)
    }

    /// 現在のロケールで `key` を翻訳する
    ///
    /// 解決できないキーはそのまま返すため、翻訳漏れはエラーではなくキーとして表示される。
    ///
    /// # Errors
    /// [`TranslatorError::NoLocaleSet`]: ロケールが選択されていない
    pub fn translate(&self, key: &str) -> Result<String, TranslatorError> {
        match self.try_translate(key) {
            Err(TranslatorError::Resolve(error)) => {
                tracing::debug!(%error, "Missing translation, using the key");
                Ok(key.to_string())
            }
            result => result,
        }
    }

    /// 現在のロケールで `key` を翻訳する（解決エラーも返す）
    ///
    /// # Errors
    /// - [`TranslatorError::NoLocaleSet`]: ロケールが選択されていない
    /// - [`TranslatorError::Resolve`]: キーが翻訳を指していない
    pub fn try_translate(&self, key: &str) -> Result<String, TranslatorError> {
        let locale = self.locale()?;
        let tree = self.tree(&locale).ok_or(TranslatorError::LocaleNotFound(locale))?;
        Ok(tree.resolve(key)?.to_string())
    }

    /// `content` を `locale` のロケールファイルとしてパースし、追加する
    ///
    /// # Errors
    /// - [`TranslatorError::Parse`]: 内容が不正
    /// - [`TranslatorError::AlreadyLoaded`]: ロケールが既に存在する
    pub fn load_from_str(&self, locale: &str, content: &str) -> Result<(), TranslatorError> {
        let tree = parse_locale(locale, content.lines())?;
        self.insert(tree)
    }

    /// パース済みのツリーを追加する
    ///
    /// # Errors
    /// [`TranslatorError::AlreadyLoaded`]: ロケールが既に存在する
    pub fn insert(&self, tree: TranslationTree) -> Result<(), TranslatorError> {
        let mut translations = self.write_translations();
        if translations.contains_key(tree.locale()) {
            return Err(TranslatorError::AlreadyLoaded(tree.locale().to_string()));
        }
        translations.insert(tree.locale().to_string(), Arc::new(tree));
        Ok(())
    }

    /// 読み込み済みロケールのツリーを取得
    #[must_use]
    pub fn tree(&self, locale: &str) -> Option<Arc<TranslationTree>> {
        self.read_translations().get(locale).cloned()
    }

    /// 読み込み済みのロケール一覧（ソート済み）
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.read_translations().keys().cloned().collect();
        locales.sort();
        locales
    }

    #[must_use]
    pub fn is_loaded(&self, locale: &str) -> bool {
        self.read_translations().contains_key(locale)
    }

    /// 未読み込みなら言語ディレクトリから `locale` を読み込む
    ///
    /// 書き込みロック取得後に再確認し、同時に呼ばれても各ロケールは一度だけ構築する。
    fn ensure_loaded(&self, locale: &str) -> Result<(), TranslatorError> {
        if self.is_loaded(locale) {
            return Ok(());
        }

        let mut translations = self.write_translations();
        if translations.contains_key(locale) {
            return Ok(());
        }

        let Some(file) = find_locale_file(&self.lang_dir, &self.settings.file_pattern, locale)?
        else {
            return Err(TranslatorError::LocaleNotFound(locale.to_string()));
        };
        let tree = load_translation_file(&file)?;
        translations.insert(locale.to_string(), Arc::new(tree));

        Ok(())
    }

    fn read_translations(&self) -> RwLockReadGuard<'_, TranslationMap> {
        self.translations.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_translations(&self) -> RwLockWriteGuard<'_, TranslationMap> {
        self.translations.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `files` を最大 `num_threads` 個のスレッドで読み込む
fn load_in_parallel(
    files: &[&LocaleFile],
    num_threads: usize,
) -> Vec<Result<TranslationTree, LoadError>> {
    let chunk_size = files.len().div_ceil(num_threads.max(1)).max(1);

    thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk.iter().map(|file| load_translation_file(file)).collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}
