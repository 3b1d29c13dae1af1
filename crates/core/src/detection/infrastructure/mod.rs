pub mod ssd_face_localizer;
