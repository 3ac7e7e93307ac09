use std::fmt;

/// 生成引擎错误
#[derive(Debug)]
pub enum EngineError {
    /// 请求发送失败
    RequestFailed {
        engine: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回异常响应
    BadResponse { engine: String, message: String },
    /// 流式传输中断
    StreamInterrupted {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 流式分片解析失败
    ChunkParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回结果为空
    EmptyResponse { engine: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::RequestFailed { engine, source } => {
                write!(f, "引擎请求失败 ({}): {}", engine, source)
            }
            EngineError::BadResponse { engine, message } => {
                write!(f, "引擎返回异常 ({}): {}", engine, message)
            }
            EngineError::StreamInterrupted { source } => {
                write!(f, "流式传输中断: {}", source)
            }
            EngineError::ChunkParseFailed { source } => {
                write!(f, "流式分片解析失败: {}", source)
            }
            EngineError::EmptyResponse { engine } => {
                write!(f, "引擎返回结果为空 ({})", engine)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::RequestFailed { source, .. }
            | EngineError::StreamInterrupted { source }
            | EngineError::ChunkParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound { path: String },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl EngineError {
    /// 创建请求失败错误
    pub fn request_failed(
        engine: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngineError::RequestFailed {
            engine: engine.into(),
            source: Box::new(source),
        }
    }

    /// 创建异常响应错误
    pub fn bad_response(engine: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::BadResponse {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// 创建流式传输中断错误
    pub fn stream_interrupted(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        EngineError::StreamInterrupted {
            source: Box::new(source),
        }
    }

    /// 创建分片解析失败错误
    pub fn chunk_parse_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        EngineError::ChunkParseFailed {
            source: Box::new(source),
        }
    }

    /// 创建空响应错误
    pub fn empty_response(engine: impl Into<String>) -> Self {
        EngineError::EmptyResponse {
            engine: engine.into(),
        }
    }
}

impl FileError {
    /// 创建文件不存在错误
    pub fn not_found(path: &std::path::Path) -> Self {
        FileError::NotFound {
            path: path.display().to_string(),
        }
    }

    /// 创建文件读取失败错误
    pub fn read_failed(
        path: &std::path::Path,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FileError::ReadFailed {
            path: path.display().to_string(),
            source: Box::new(source),
        }
    }
}
