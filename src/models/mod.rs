mod channel;
mod keyword;
mod summary;
mod video;

pub use channel::{Channel, NewChannel};
pub use keyword::{Keyword, KeywordKind, NewKeyword, TagGroup, TagGroupMember};
pub use summary::{Report, ReportStatus, Summary};
pub use video::{NewVideo, SortOrder, Video, VideoFilter, VideoQuery};
