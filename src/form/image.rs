//! 菜谱图片
//!
//! 上传前检查大小和类型，并提供 Base64 data URL 的编解码

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{AppError, AppResult, FileError};

/// 待上传的图片文件
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    /// 声明的 MIME 类型（来自文件扩展名）
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    /// 由文件名推断 MIME 类型
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// 读取本地图片文件
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::File(FileError::NotFound {
                path: path.display().to_string(),
            }));
        }
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// 上传前检查：不超过 `max_bytes`，且确实是图片
    pub fn check(&self, max_bytes: usize) -> AppResult<()> {
        if self.bytes.len() > max_bytes {
            return Err(AppError::File(FileError::ImageTooLarge {
                size: self.bytes.len(),
                limit: max_bytes,
            }));
        }
        if !self.mime.starts_with("image/") {
            return Err(AppError::File(FileError::NotAnImage {
                mime: self.mime.clone(),
            }));
        }
        if sniff_mime(&self.bytes).is_none() {
            return Err(AppError::File(FileError::NotAnImage {
                mime: "application/octet-stream".to_string(),
            }));
        }
        Ok(())
    }

    /// 实际内容对应的 MIME 类型，无法识别时退回声明值
    pub fn effective_mime(&self) -> &str {
        sniff_mime(&self.bytes).unwrap_or(self.mime.as_str())
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        encode_data_url(self.effective_mime(), &self.bytes)
    }
}

/// 按文件头识别常见图片格式
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// 解析 data URL，返回 (MIME, 原始字节)
pub fn decode_data_url(data_url: &str) -> AppResult<(String, Vec<u8>)> {
    let invalid = |reason: &str| {
        AppError::File(FileError::InvalidDataUrl {
            reason: reason.to_string(),
        })
    };

    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| invalid("缺少逗号分隔的数据部分"))?;
    let meta = header
        .strip_prefix("data:")
        .ok_or_else(|| invalid("缺少 data: 前缀"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("不是 base64 编码"))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| invalid(&e.to_string()))?;

    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(extra: usize) -> Vec<u8> {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend(std::iter::repeat(0u8).take(extra));
        bytes
    }

    #[test]
    fn test_check_accepts_small_png() {
        let image = ImageFile::from_bytes("egg.png", png(16));
        assert_eq!(image.mime, "image/png");
        assert!(image.check(5 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_check_rejects_oversized_file() {
        let image = ImageFile::from_bytes("big.png", png(64));
        let err = image.check(32).unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::ImageTooLarge { size: 72, limit: 32 })
        ));
    }

    #[test]
    fn test_check_rejects_non_image() {
        let text = ImageFile::from_bytes("memo.txt", b"hello".to_vec());
        assert!(matches!(
            text.check(1024),
            Err(AppError::File(FileError::NotAnImage { .. }))
        ));

        let disguised = ImageFile::from_bytes("fake.jpg", b"not really".to_vec());
        assert!(disguised.check(1024).is_err());
    }

    #[test]
    fn test_data_url_decodes_back() {
        let image = ImageFile::from_bytes("photo.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2]);
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));

        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, image.bytes);
    }

    #[test]
    fn test_decode_rejects_missing_comma() {
        assert!(decode_data_url("data:image/png;base64").is_err());
    }
}
