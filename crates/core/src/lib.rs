pub mod capture {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod classification {
    pub mod domain {
        pub mod age_classifier;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detection;
        pub mod detection_tensor;
        pub mod face_localizer;
    }
    pub mod infrastructure;
}

pub mod fare {
    pub mod domain {
        pub mod age_bucket;
        pub mod fare_policy;
    }
}

pub mod inference {
    pub mod domain {
        pub mod blob;
        pub mod inference_model;
        pub mod tensor_layout_error;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod annotate_frame_use_case;
    pub mod frame_report;
    pub mod pipeline_logger;
    pub mod validate_stream_use_case;
}

pub mod rendering {
    pub mod domain {
        pub mod annotation_renderer;
        pub mod render_sink;
        pub mod stop_signal;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod annotation;
    pub mod bounding_box;
    pub mod constants;
    pub mod frame;
    pub mod video_metadata;
}
