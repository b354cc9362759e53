/// Times a block and records the elapsed seconds in the given histogram.
#[macro_export]
macro_rules! measure {
    ($metric:expr, $code:block) => {{
        let start = std::time::Instant::now();
        let result = $code;
        let elapsed = start.elapsed();

        $metric.observe(elapsed.as_secs_f64());
        result
    }};
}
