// Logging Tests
//
// Tests for the logging module.

#[cfg(test)]
mod tests {
    use crate::logging::*;

    mod log_level_tests {
        use super::*;

        #[test]
        fn should_have_correct_ordering() {
            assert!(LogLevel::Debug < LogLevel::Info);
            assert!(LogLevel::Info < LogLevel::Warn);
            assert!(LogLevel::Warn < LogLevel::Error);
        }

        #[test]
        fn should_parse_level_names() {
            assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
            assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
            assert!("loud".parse::<LogLevel>().is_err());
        }
    }

    mod console_logger_tests {
        use super::*;

        #[test]
        fn should_check_level_enabled() {
            let logger = ConsoleLogger::new(LogLevel::Warn);

            assert!(!logger.is_enabled(LogLevel::Debug));
            assert!(!logger.is_enabled(LogLevel::Info));
            assert!(logger.is_enabled(LogLevel::Warn));
            assert!(logger.is_enabled(LogLevel::Error));
        }
    }

    mod memory_logger_tests {
        use super::*;

        #[test]
        fn should_record_enabled_messages_only() {
            let logger = MemoryLogger::new(LogLevel::Info);

            logger.debug("hidden");
            logger.info("shown");
            logger.warn("also shown");

            assert_eq!(logger.records().len(), 2);
            assert!(logger.contains(LogLevel::Info, "shown"));
            assert!(!logger.contains(LogLevel::Debug, "hidden"));
        }
    }

    mod null_logger_tests {
        use super::*;

        #[test]
        fn should_not_log_anything() {
            let logger = NullLogger::new();

            logger.debug("debug message");
            logger.info("info message");
            logger.warn("warn message");
            logger.error("error message");
            assert_eq!(logger.level(), LogLevel::Error);
        }
    }
}
