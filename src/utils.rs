use crate::error::{AnnotationError, Result};

/// 检查字符串是否为有效的整数
pub fn is_integer_number(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }

    let digits = s.strip_prefix('+').or_else(|| s.strip_prefix('-')).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// 移除行内注释（`#` 或 `;` 之后的内容）
pub fn strip_inline_comment(line: &str) -> &str {
    match line.find(|c: char| c == '#' || c == ';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// 解析触发码：必须是非零整数
pub fn parse_trigger_code(name: &str, value: &str) -> Result<i32> {
    let value = value.trim();
    let invalid = || AnnotationError::InvalidTriggerCode {
        name: name.to_string(),
        value: value.to_string(),
    };

    if !is_integer_number(value) {
        return Err(invalid());
    }
    match value.parse::<i32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(code) => Ok(code),
    }
}

/// 采样点索引转换为秒
pub fn samples_to_seconds(samples: u64, sample_rate: f64) -> f64 {
    samples as f64 / sample_rate
}

/// 采样率必须为有限正数
pub fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(AnnotationError::InvalidSampleRate(sample_rate))
    }
}
