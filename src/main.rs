//! BusRelay - firmware entry point
//!
//! 1. Core 1: receive task (scan, assemble, rewrite, enqueue)
//! 2. Core 0: main task runs the transmit loop; drains logs while idle
//!
//! Both loops busy-poll forever. The task watchdog idle checks are disabled
//! in sdkconfig.defaults.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod device {
    use core::ffi::c_void;

    use esp_idf_svc::hal::cpu::Core;
    use esp_idf_svc::hal::delay::Ets;
    use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::task;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys as esp_idf_sys;

    use busrelay::log_drain::LogDrain;
    use busrelay::logging::LogStream;
    use busrelay::{
        rt_error, rt_info, BusInput, EdgeScanner, FaultState, FrameAssembler, FrameQueue,
        FrameRewriter, ReceiveWorker, RelayStats, RxShared, TransmitDriver, TxShared, CONFIG,
        RX_LOG, TX_LOG,
    };

    // Composition point: the only instances, handed to both loops by reference.
    static FRAME_QUEUE: FrameQueue = FrameQueue::new();
    static STATS: RelayStats = RelayStats::new();
    static FAULT_STATE: FaultState = FaultState::new();

    fn timestamp_us() -> i64 {
        unsafe { esp_idf_sys::esp_timer_get_time() }
    }

    /// Park the calling task after an unrecoverable init failure.
    fn halt() -> ! {
        loop {
            unsafe {
                esp_idf_sys::vTaskDelay(1000);
            }
        }
    }

    /// Receive task (core 1).
    extern "C" fn receive_task(_arg: *mut c_void) {
        // SAFETY: bus input pins are dedicated to this task.
        let clk = PinDriver::input(unsafe { AnyInputPin::new(CONFIG.pins.clock_in) });
        let dio = PinDriver::input(unsafe { AnyInputPin::new(CONFIG.pins.data_in) });
        let (Ok(clk), Ok(dio)) = (clk, dio) else {
            rt_error!(RX_LOG, timestamp_us(), "rx: input pin init failed");
            halt();
        };

        let input = BusInput::new(clk, dio).with_stall_limit(CONFIG.stall_poll_limit);
        let assembler = FrameAssembler::new(EdgeScanner::new(input));
        let shared = RxShared {
            queue: &FRAME_QUEUE,
            stats: &STATS,
            fault: &FAULT_STATE,
            log: &RX_LOG,
            now_us: timestamp_us,
        };

        let mut worker = ReceiveWorker::new(
            assembler,
            FrameRewriter::new(CONFIG.rewrite_enabled),
            shared,
        );
        worker.run()
    }

    #[no_mangle]
    fn main() {
        esp_idf_sys::link_patches();

        let Some(peripherals) = Peripherals::take().ok() else {
            halt();
        };

        let uart_config =
            uart::config::Config::default().baudrate(Hertz(CONFIG.log_uart.baud_rate));
        let mut uart = match UartTxDriver::new(
            peripherals.uart1,
            // SAFETY: log TX pin is not used elsewhere.
            unsafe { AnyOutputPin::new(CONFIG.log_uart.tx_pin) },
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &uart_config,
        ) {
            Ok(uart) => uart,
            Err(_) => halt(),
        };

        rt_info!(TX_LOG, timestamp_us(), "{}", env!("VERSION_STRING"));

        // SAFETY: bus output pins are dedicated to this task.
        let clk = PinDriver::output(unsafe { AnyOutputPin::new(CONFIG.pins.clock_out) });
        let dio = PinDriver::output(unsafe { AnyOutputPin::new(CONFIG.pins.data_out) });
        let (Ok(clk), Ok(dio)) = (clk, dio) else {
            rt_error!(TX_LOG, timestamp_us(), "tx: output pin init failed");
            halt();
        };

        // SAFETY: receive_task takes no argument and never returns.
        let spawned = unsafe {
            task::create(
                receive_task,
                c"relay-rx",
                CONFIG.rx_stack_size,
                core::ptr::null_mut(),
                CONFIG.rx_priority,
                Some(Core::Core1),
            )
        };
        if spawned.is_err() {
            rt_error!(TX_LOG, timestamp_us(), "rx task spawn failed");
        }

        let streams: [&LogStream; 2] = [&TX_LOG, &RX_LOG];
        let mut drain = LogDrain::new(&streams, &FAULT_STATE);

        let mut driver = TransmitDriver::new(clk, dio, Ets, CONFIG.timing);
        let shared = TxShared {
            queue: &FRAME_QUEUE,
            stats: &STATS,
            fault: &FAULT_STATE,
            log: &TX_LOG,
            now_us: timestamp_us,
        };
        driver.run(shared, || {
            drain.pass(timestamp_us(), |bytes| {
                let _ = uart.write(bytes);
            });
        })
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!(
        "{}: the relay drives GPIO and needs an ESP-IDF target (e.g. xtensa-esp32s3-espidf)",
        env!("VERSION_STRING")
    );
    std::process::exit(1);
}
