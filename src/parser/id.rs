//! 题目稳定 ID
//!
//! ID 只由题干文本决定，重新上传同一个文件时收藏依然有效。
//! 不是加密哈希，只要求同一文件内冲突足够少。

/// ID 前缀
const ID_PREFIX: &str = "q-";

/// 根据题干生成稳定 ID
///
/// 对 UTF-16 编码单元做 `h = h * 31 + c` 的 32 位滚动哈希，取绝对值后转为 36 进制。
/// 与浏览器版本生成的 ID 保持一致，旧的收藏可以继续使用。
pub fn stable_id(text: &str) -> String {
    let hash = text
        .trim()
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));

    format!("{}{}", ID_PREFIX, to_base36(i64::from(hash).unsigned_abs()))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();

    // DIGITS 全是 ASCII
    String::from_utf8_lossy(&buf).into_owned()
}
