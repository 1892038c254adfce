pub mod exam_center;
pub mod exam_session;
