//! Language tags and the localized message table.
//!
//! The language only changes what users read; parsing behaviour is the
//! same for every tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tr" => Ok(Self::Tr),
            "en" => Ok(Self::En),
            other => Err(format!("unknown language tag: {}", other)),
        }
    }
}

/// Keys of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    ErrExcel,
    ErrTxt,
    ErrDocx,
    ErrJson,
    ErrPdf,
    ErrFormat,
    ErrorLimit,
    ErrorGeneral,
    ErrorInvalidUrl,
    ZipError,
    CopySuccess,
    NoFile,
    ConfirmTitle,
    ConfirmMessage,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        let (tr, en) = match self {
            Self::ErrExcel => ("Excel/CSV dosyası okunamadı.", "Excel/CSV file could not be read."),
            Self::ErrTxt => ("Metin dosyası okunamadı.", "Text file could not be read."),
            Self::ErrDocx => ("Word dosyası okunamadı.", "Word file could not be read."),
            Self::ErrJson => ("Geçersiz JSON dosyası.", "Invalid JSON file."),
            Self::ErrPdf => ("PDF dosyası okunamadı.", "PDF file could not be read."),
            Self::ErrFormat => ("Desteklenmeyen dosya formatı.", "Unsupported file format."),
            Self::ErrorLimit => (
                "Toplu yükleme sınırı aşıldı. Tek seferde en fazla 15 dosya yükleyebilirsiniz.",
                "Bulk upload limit exceeded. You can upload max 15 files at once.",
            ),
            Self::ErrorGeneral => (
                "Dosya işleme sırasında genel bir hata oluştu.",
                "An error occurred during file processing.",
            ),
            Self::ErrorInvalidUrl => (
                "Geçerli bir Google Doküman URL'si veya ID'si giriniz.",
                "Please enter a valid Google Doc URL or ID.",
            ),
            Self::ZipError => (
                "ZIP dosyası oluşturulurken hata oluştu.",
                "Error creating ZIP file.",
            ),
            Self::CopySuccess => (
                "Aktif dosya JSON verisi panoya kopyalandı!",
                "Active file JSON data copied to clipboard!",
            ),
            Self::NoFile => ("Görüntülenecek dosya yok", "No file to display"),
            Self::ConfirmTitle => ("Tümünü Temizle", "Clear All"),
            Self::ConfirmMessage => (
                "Listedeki tüm dosyalar kaldırılacak. Bu işlem geri alınamaz. Onaylıyor musunuz?",
                "All files in the list will be removed. This cannot be undone. Do you confirm?",
            ),
        };

        match language {
            Language::Tr => tr,
            Language::En => en,
        }
    }
}
