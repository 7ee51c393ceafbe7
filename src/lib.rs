// 网络媒体缓存库
//
// 本库提供网络媒体的客户端磁盘缓存，包括：
// - 缓存引擎（位图、SVG、Lottie）
// - 本地 HTTP 服务接口

pub mod api;
pub mod services;
